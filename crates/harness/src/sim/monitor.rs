//! Per-edge bus event predicates.
//!
//! Each monitor is evaluated once per clock edge against the model's current
//! bus signals. The completion check is level-triggered; host-out detection
//! is edge-triggered so a write held on the bus across cycles is observed
//! exactly once.

use crate::model::Dut;

/// Whether the completion pattern is on the bus this cycle.
///
/// Fires while `address == finish_addr`, the write request is asserted, and
/// the write data is exactly 1. Level-triggered: it reports true on every
/// qualifying cycle, and the run loop terminates on the first one.
pub fn is_finished<D: Dut + ?Sized>(dut: &D, finish_addr: u32) -> bool {
    dut.bus_address() == finish_addr && dut.bus_write_request() && dut.bus_write_data() == 1
}

/// Edge-triggered detector for host-out bytes.
///
/// Tracks the write-request level from the previous poll and fires only on a
/// transition from deasserted to asserted while the address matches and the
/// data is nonzero. The latch lives on the harness instance, so every run
/// starts with it re-armed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostOutMonitor {
    seen_request: bool,
}

impl HostOutMonitor {
    /// A monitor with the request latch cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls the bus; returns the emitted byte on a qualifying rising edge.
    pub fn poll<D: Dut + ?Sized>(&mut self, dut: &D, host_out_addr: u32) -> Option<u8> {
        let request = dut.bus_write_request();
        let fired = request
            && !self.seen_request
            && dut.bus_address() == host_out_addr
            && dut.bus_write_data() != 0;
        self.seen_request = request;
        fired.then(|| (dut.bus_write_data() & 0xff) as u8)
    }
}

/// UART transmit pacing check.
///
/// Returns the byte entering the transmitter when the clock is high, a write
/// targets the UART data register, and the transmitter's bit counter is at
/// its start state. The run loop then advances simulated time by a full UART
/// frame instead of the run quantum, so character throughput in the trace
/// matches real line timing rather than the free-running bus rate.
pub fn uart_pacing<D: Dut + ?Sized>(dut: &D, uart_addr: u32) -> Option<u8> {
    let fired = dut.clock()
        && dut.bus_address() == uart_addr
        && dut.bus_write_request()
        && dut.uart_tx_idle();
    fired.then(|| (dut.bus_write_data() & 0xff) as u8)
}
