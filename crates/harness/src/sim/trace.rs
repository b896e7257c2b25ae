//! VCD waveform recording.
//!
//! [`TraceSink`] owns the waveform file for the run. It moves from closed to
//! open at most once, at startup, and back to closed at most once, through a
//! single idempotent [`close`](TraceSink::close) shared by the normal
//! termination path and interrupt-requested shutdown. While open, every
//! simulated-time advance is followed by a [`dump`](TraceSink::dump) before
//! the next signal mutation, so samples stay causally ordered.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use vcd_ng::{IdCode, SimulationCommand, TimescaleUnit, Value, VecValue, Writer};

use crate::common::{HarnessError, Result};
use crate::model::Dut;

/// The bus-interface signals recorded in the trace.
struct Channels {
    writer: Writer<BufWriter<File>>,
    clock: IdCode,
    reset_n: IdCode,
    address: IdCode,
    write_request: IdCode,
    write_data: IdCode,
    read_data: IdCode,
    last: LastValues,
}

/// Previously dumped values, for change suppression.
#[derive(Default)]
struct LastValues {
    clock: Option<bool>,
    reset_n: Option<bool>,
    address: Option<u32>,
    write_request: Option<bool>,
    write_data: Option<u32>,
    read_data: Option<u32>,
}

/// Waveform sink for one run; `None` inside means closed (or never enabled).
pub struct TraceSink {
    channels: Option<Channels>,
    path: PathBuf,
}

impl fmt::Debug for TraceSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceSink")
            .field("path", &self.path)
            .field("open", &self.channels.is_some())
            .finish()
    }
}

impl TraceSink {
    /// A sink that records nothing; every operation is a no-op.
    pub fn disabled() -> Self {
        Self {
            channels: None,
            path: PathBuf::new(),
        }
    }

    /// Opens a VCD file at `path` and writes the header and declarations.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Trace`] when the file cannot be created or the header
    /// cannot be written.
    pub fn open(path: &Path) -> Result<Self> {
        let err = |source| HarnessError::Trace {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(err)?;
        let mut writer = Writer::new(BufWriter::new(file));

        writer.timescale(1, TimescaleUnit::NS).map_err(err)?;
        writer.add_module("cosim").map_err(err)?;
        let clock = writer.add_wire(1, "clock").map_err(err)?;
        let reset_n = writer.add_wire(1, "reset_n").map_err(err)?;
        let address = writer.add_wire(32, "manager_rw_address").map_err(err)?;
        let write_request = writer.add_wire(1, "manager_write_request").map_err(err)?;
        let write_data = writer.add_wire(32, "manager_write_data").map_err(err)?;
        let read_data = writer.add_wire(32, "manager_read_data").map_err(err)?;
        writer.upscope().map_err(err)?;
        writer.enddefinitions().map_err(err)?;
        writer.begin(SimulationCommand::Dumpvars).map_err(err)?;

        info!(path = %path.display(), "trace opened");
        Ok(Self {
            channels: Some(Channels {
                writer,
                clock,
                reset_n,
                address,
                write_request,
                write_data,
                read_data,
                last: LastValues::default(),
            }),
            path: path.to_path_buf(),
        })
    }

    /// Whether the sink currently owns an open file.
    pub fn is_open(&self) -> bool {
        self.channels.is_some()
    }

    /// Records one sample of the bus interface at simulated time `time`.
    ///
    /// No-op when the sink is disabled or already closed.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Trace`] on write failure.
    pub fn dump<D: Dut + ?Sized>(&mut self, time: u64, dut: &D) -> Result<()> {
        let Some(channels) = self.channels.as_mut() else {
            return Ok(());
        };
        channels.sample(time, dut).map_err(|source| HarnessError::Trace {
            path: self.path.clone(),
            source,
        })
    }

    /// Closes the sink, flushing the file. Safe to call more than once.
    pub fn close(&mut self) {
        if self.channels.take().is_some() {
            debug!(path = %self.path.display(), "trace closed");
        }
    }
}

impl Drop for TraceSink {
    fn drop(&mut self) {
        self.close();
    }
}

impl Channels {
    fn sample<D: Dut + ?Sized>(&mut self, time: u64, dut: &D) -> io::Result<()> {
        self.writer.timestamp(time)?;

        let clock = dut.clock();
        if self.last.clock != Some(clock) {
            self.last.clock = Some(clock);
            self.writer.change_scalar(self.clock, scalar(clock))?;
        }

        let reset_n = !dut.reset_asserted();
        if self.last.reset_n != Some(reset_n) {
            self.last.reset_n = Some(reset_n);
            self.writer.change_scalar(self.reset_n, scalar(reset_n))?;
        }

        let address = dut.bus_address();
        if self.last.address != Some(address) {
            self.last.address = Some(address);
            self.writer.change_vector(self.address, &bits(address))?;
        }

        let write_request = dut.bus_write_request();
        if self.last.write_request != Some(write_request) {
            self.last.write_request = Some(write_request);
            self.writer
                .change_scalar(self.write_request, scalar(write_request))?;
        }

        let write_data = dut.bus_write_data();
        if self.last.write_data != Some(write_data) {
            self.last.write_data = Some(write_data);
            self.writer.change_vector(self.write_data, &bits(write_data))?;
        }

        let read_data = dut.bus_read_data();
        if self.last.read_data != Some(read_data) {
            self.last.read_data = Some(read_data);
            self.writer.change_vector(self.read_data, &bits(read_data))?;
        }

        Ok(())
    }
}

fn scalar(level: bool) -> Value {
    if level { Value::V1 } else { Value::V0 }
}

/// Expands a word into VCD bit order, most significant bit first.
fn bits(value: u32) -> VecValue {
    let mut out = VecValue::new();
    for bit in 0..32 {
        out.push(scalar(value & (1 << (31 - bit)) != 0));
    }
    out
}
