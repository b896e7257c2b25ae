//! The model-facing interface of the harness.
//!
//! The hardware model is an opaque, cycle-evaluated entity: the harness
//! drives its clock and reset inputs, steps it with `eval`, and reads its
//! bus outputs. Everything the harness needs is collected in the [`Dut`]
//! trait so that monitors, the loader, and the trace recorder depend on a
//! narrow accessor surface rather than on any model's internal hierarchy.

/// Behavioral stand-in model with a tightly coupled memory.
pub mod tcm;

pub use tcm::{BusEvent, TcmDut};

/// Narrow interface between the harness and a steppable hardware model.
///
/// Implementations wrap whatever the model actually is (a generated RTL
/// simulation object, a behavioral stand-in, a remote process). The harness
/// never constructs or inspects model internals; it only drives inputs and
/// reads the signals named here.
///
/// `eval` advances combinational and sequential state for the current input
/// values. Sequential state moves on clock transitions, so the harness calls
/// `set_clock` and then `eval` once per edge.
pub trait Dut {
    /// Drives the clock input.
    fn set_clock(&mut self, level: bool);

    /// Current clock input level.
    fn clock(&self) -> bool;

    /// Drives the reset input. `true` asserts reset.
    fn set_reset(&mut self, asserted: bool);

    /// Whether reset is currently asserted.
    fn reset_asserted(&self) -> bool;

    /// Evaluates the model for the current input values.
    fn eval(&mut self);

    /// Current bus address driven by the model's bus manager.
    fn bus_address(&self) -> u32;

    /// Whether the bus manager is requesting a write this cycle.
    fn bus_write_request(&self) -> bool;

    /// Data the bus manager is writing this cycle.
    fn bus_write_data(&self) -> u32;

    /// Data returned to the bus manager this cycle.
    fn bus_read_data(&self) -> u32;

    /// Reads a word from model memory by word index.
    fn mem_word(&self, index: u32) -> u32;

    /// Writes a word into model memory by word index.
    fn mem_write_word(&mut self, index: u32, value: u32);

    /// Size of the model memory in bytes.
    fn mem_size_bytes(&self) -> u32;

    /// Whether the UART transmitter's bit counter is at its start state.
    ///
    /// True means a write to the UART data register this cycle starts a new
    /// frame, which is when the run loop applies frame-time pacing.
    fn uart_tx_idle(&self) -> bool;
}
