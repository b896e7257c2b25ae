//! Behavioral stand-in model with a tightly coupled memory.
//!
//! [`TcmDut`] implements the bus-visible contract of a real model without any
//! instruction execution: a word-addressed memory that clears while reset is
//! asserted, and a scriptable bus agent that drives one [`BusEvent`] per
//! rising clock edge once reset is released. It exists so the harness can be
//! exercised end to end (and brought up on a new machine) without binding a
//! generated RTL model; real models implement [`Dut`] the same way.

use std::collections::VecDeque;

use crate::model::Dut;

/// One bus transaction driven by the scripted agent.
///
/// The agent holds the event's signal values for `hold` rising edges before
/// moving to the next event, which is how level-held and edge-triggered
/// monitor behavior gets exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusEvent {
    /// Address driven on the bus.
    pub address: u32,
    /// Write data driven on the bus.
    pub data: u32,
    /// Whether the write-request line is asserted.
    pub write: bool,
    /// Number of consecutive rising edges the event stays on the bus.
    pub hold: u32,
}

impl BusEvent {
    /// A write of `data` to `address`, held for one cycle.
    pub fn write(address: u32, data: u32) -> Self {
        Self {
            address,
            data,
            write: true,
            hold: 1,
        }
    }

    /// An idle bus (no request) for `cycles` rising edges.
    pub fn idle(cycles: u32) -> Self {
        Self {
            address: 0,
            data: 0,
            write: false,
            hold: cycles,
        }
    }

    /// Keeps the event on the bus for `cycles` rising edges.
    pub fn held(mut self, cycles: u32) -> Self {
        self.hold = cycles;
        self
    }
}

/// Behavioral model: tightly coupled memory plus a scripted bus agent.
///
/// Asserting reset clears the memory (the reason the harness loads images
/// only after reset release). Edge counters are exposed so tests can assert
/// the exact shape of the reset sequence.
#[derive(Debug)]
pub struct TcmDut {
    mem: Vec<u32>,
    clock: bool,
    clock_at_last_eval: bool,
    reset: bool,
    address: u32,
    write_request: bool,
    write_data: u32,
    read_data: u32,
    tx_idle: bool,
    script: VecDeque<BusEvent>,
    holds_left: u32,
    /// Total `eval` calls observed.
    pub evals: u64,
    /// Rising clock edges observed.
    pub posedges: u64,
    /// Falling clock edges observed.
    pub negedges: u64,
}

impl TcmDut {
    /// Creates a model with `mem_size_bytes` of word-addressed memory.
    pub fn new(mem_size_bytes: u32) -> Self {
        Self {
            mem: vec![0; (mem_size_bytes / 4) as usize],
            clock: false,
            clock_at_last_eval: false,
            reset: false,
            address: 0,
            write_request: false,
            write_data: 0,
            read_data: 0,
            tx_idle: true,
            script: VecDeque::new(),
            holds_left: 0,
            evals: 0,
            posedges: 0,
            negedges: 0,
        }
    }

    /// Appends bus events for the agent to drive after reset release.
    pub fn with_script(mut self, events: impl IntoIterator<Item = BusEvent>) -> Self {
        self.script.extend(events);
        self
    }

    /// Queues one more bus event.
    pub fn push_event(&mut self, event: BusEvent) {
        self.script.push_back(event);
    }

    /// Forces the UART transmitter busy or idle.
    pub fn set_tx_idle(&mut self, idle: bool) {
        self.tx_idle = idle;
    }

    fn drive_idle(&mut self) {
        self.address = 0;
        self.write_request = false;
        self.write_data = 0;
    }

    /// Advances the scripted agent by one rising edge.
    fn step_script(&mut self) {
        if self.holds_left > 0 {
            self.holds_left -= 1;
            return;
        }
        match self.script.pop_front() {
            Some(event) => {
                self.address = event.address;
                self.write_request = event.write;
                self.write_data = event.data;
                self.holds_left = event.hold.saturating_sub(1);
            }
            None => self.drive_idle(),
        }
    }
}

impl Dut for TcmDut {
    fn set_clock(&mut self, level: bool) {
        self.clock = level;
    }

    fn clock(&self) -> bool {
        self.clock
    }

    fn set_reset(&mut self, asserted: bool) {
        self.reset = asserted;
    }

    fn reset_asserted(&self) -> bool {
        self.reset
    }

    fn eval(&mut self) {
        self.evals += 1;
        let rising = self.clock && !self.clock_at_last_eval;
        let falling = !self.clock && self.clock_at_last_eval;
        self.clock_at_last_eval = self.clock;
        if rising {
            self.posedges += 1;
        } else if falling {
            self.negedges += 1;
        }

        if rising {
            if self.reset {
                // Synchronous reset wipes the memory and keeps the bus quiet.
                self.mem.fill(0);
                self.drive_idle();
            } else {
                self.step_script();
            }
        }

        let index = (self.address / 4) as usize;
        self.read_data = if self.write_request {
            0
        } else {
            self.mem.get(index).copied().unwrap_or(0)
        };
    }

    fn bus_address(&self) -> u32 {
        self.address
    }

    fn bus_write_request(&self) -> bool {
        self.write_request
    }

    fn bus_write_data(&self) -> u32 {
        self.write_data
    }

    fn bus_read_data(&self) -> u32 {
        self.read_data
    }

    fn mem_word(&self, index: u32) -> u32 {
        self.mem.get(index as usize).copied().unwrap_or(0)
    }

    fn mem_write_word(&mut self, index: u32, value: u32) {
        if let Some(slot) = self.mem.get_mut(index as usize) {
            *slot = value;
        }
    }

    fn mem_size_bytes(&self) -> u32 {
        (self.mem.len() * 4) as u32
    }

    fn uart_tx_idle(&self) -> bool {
        self.tx_idle
    }
}
