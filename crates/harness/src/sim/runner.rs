//! Reset sequencing and the top-level run loop.
//!
//! [`Harness`] owns the model and every per-run resource side by side: the
//! simulated clock, the trace sink, the host-out edge latch, and the console
//! sink for emulated peripheral output. One instance is one run; monitors
//! start re-armed and the trace opens and closes exactly once.
//!
//! Within one loop iteration the model is stepped before any monitor reads
//! its signals, and time is advanced before the trace sample captures it, so
//! traces are monotonic and causally consistent with cycle order.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::common::{HarnessError, Result};
use crate::config::{RunConfig, defaults};
use crate::model::Dut;
use crate::sim::clock::SimClock;
use crate::sim::monitor::{self, HostOutMonitor};
use crate::sim::trace::TraceSink;
use crate::sim::{interrupt, loader, signature};

/// Why a run ended.
///
/// All of these are successful outcomes; fatal resource failures surface as
/// [`HarnessError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The completion pattern was observed on the bus.
    Completion,
    /// The configured cycle limit was reached.
    CycleLimit,
    /// An external interrupt requested shutdown.
    Interrupted,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Completion => write!(f, "completion"),
            ExitReason::CycleLimit => write!(f, "cycle limit"),
            ExitReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Top-level co-simulation harness: model + clock + monitors + trace.
pub struct Harness<D: Dut> {
    dut: D,
    config: RunConfig,
    clock: SimClock,
    trace: TraceSink,
    host_out: HostOutMonitor,
    console: Box<dyn Write>,
    shutdown: Option<Arc<AtomicBool>>,
}

impl<D: Dut> fmt::Debug for Harness<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl<D: Dut> Harness<D> {
    /// Creates a harness around `dut`, opening the trace if configured.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Trace`] when the configured trace file cannot be
    /// created.
    pub fn new(dut: D, config: RunConfig) -> Result<Self> {
        let trace = match &config.trace {
            Some(path) => TraceSink::open(path)?,
            None => TraceSink::disabled(),
        };
        Ok(Self {
            dut,
            config,
            clock: SimClock::new(),
            trace,
            host_out: HostOutMonitor::new(),
            console: Box::new(io::stdout()),
            shutdown: None,
        })
    }

    /// Replaces the console sink for emulated peripheral output.
    ///
    /// Defaults to stdout; diagnostics go to the log channel, never here.
    pub fn with_console(mut self, console: Box<dyn Write>) -> Self {
        self.console = console;
        self
    }

    /// Polls `flag` for shutdown instead of the process-wide interrupt flag.
    ///
    /// Useful when embedding several harnesses in one process.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map_or_else(interrupt::requested, |flag| flag.load(Ordering::SeqCst))
    }

    /// The wrapped model.
    pub fn dut(&self) -> &D {
        &self.dut
    }

    /// The wrapped model, mutably.
    pub fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// The simulated clock state.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Runs the reset sequence, then loads the program image.
    ///
    /// Reset stays asserted for the configured number of clock edges, with
    /// the clock alternating on every step and a trace sample after each one.
    /// The image loads strictly after deassertion: releasing reset with the
    /// image already in memory would clear it again.
    ///
    /// # Errors
    ///
    /// [`HarnessError::MissingImage`] without an image path; loader and trace
    /// errors propagate.
    pub fn reset_and_load(&mut self) -> Result<()> {
        self.dut.set_reset(true);
        self.dut.set_clock(false);
        self.dut.eval();

        for _ in 0..self.config.reset_hold_edges {
            self.clock.advance(defaults::RESET_QUANTUM);
            let level = self.clock.toggle();
            self.dut.set_clock(level);
            self.dut.eval();
            self.trace.dump(self.clock.time(), &self.dut)?;
        }

        self.clock.advance(defaults::RESET_QUANTUM);
        self.dut.set_reset(false);
        self.clock.set_level(true);
        self.dut.set_clock(true);
        self.dut.eval();
        self.trace.dump(self.clock.time(), &self.dut)?;
        info!(edges = self.config.reset_hold_edges, "reset released");

        let Some(path) = self.config.image.clone() else {
            return Err(HarnessError::MissingImage);
        };
        let words = self.dut.mem_size_bytes() / 4;
        let dut = &mut self.dut;
        let _ = loader::load_image(&path, self.config.format, words, |index, value| {
            dut.mem_write_word(index, value);
        })?;
        Ok(())
    }

    /// Runs the model until a termination condition fires.
    ///
    /// Performs the reset sequence and image load, then loops: toggle the
    /// clock, step the model, advance time (UART frame pacing when a
    /// character enters the transmitter), record a trace sample, and poll
    /// the monitors in priority order. The trace is closed on every exit
    /// path, including errors.
    ///
    /// # Errors
    ///
    /// Any [`HarnessError`] from loading, tracing, or the signature dump.
    pub fn run(&mut self) -> Result<ExitReason> {
        let result = self
            .reset_and_load()
            .and_then(|()| self.run_loop());
        self.finish();
        result
    }

    fn run_loop(&mut self) -> Result<ExitReason> {
        loop {
            let level = self.clock.toggle();
            self.dut.set_clock(level);
            self.dut.eval();

            if let Some(byte) = monitor::uart_pacing(&self.dut, self.config.uart_addr) {
                self.console.write_all(&[byte]).ok();
                self.clock.advance(defaults::UART_FRAME_TIME);
            } else {
                self.clock.advance(defaults::RUN_QUANTUM);
            }

            self.clock.advance(defaults::DUMP_QUANTUM);
            self.trace.dump(self.clock.time(), &self.dut)?;
            self.clock.count_half_cycle();

            if self.shutdown_requested() {
                info!("exit: interrupt");
                return Ok(ExitReason::Interrupted);
            }

            if let Some(limit) = self.config.max_cycles {
                if self.clock.cycles() >= limit {
                    info!(cycles = self.clock.cycles(), "exit: cycle limit");
                    return Ok(ExitReason::CycleLimit);
                }
            }

            if monitor::is_finished(&self.dut, self.config.finish_addr) {
                info!(
                    cycles = self.clock.cycles(),
                    addr = %format_args!("{:#x}", self.config.finish_addr),
                    "exit: completion write observed"
                );
                if let Some(path) = self.config.signature.clone() {
                    signature::dump_signature(&self.dut, &path)?;
                }
                return Ok(ExitReason::Completion);
            }

            if let Some(addr) = self.config.host_out_addr {
                if let Some(byte) = self.host_out.poll(&self.dut, addr) {
                    self.console.write_all(&[byte]).ok();
                    self.console.flush().ok();
                }
            }
        }
    }

    /// Releases per-run resources. Idempotent; called on every exit path.
    pub fn finish(&mut self) {
        self.console.flush().ok();
        self.trace.close();
    }
}
