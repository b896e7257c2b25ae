//! Simulation machinery: clock, loader, monitors, trace, and the run loop.

/// Simulated-time and cycle bookkeeping.
pub mod clock;
/// Process-wide shutdown flag set from a signal handler.
pub mod interrupt;
/// Program image parsing and injection.
pub mod loader;
/// Per-edge bus event predicates.
pub mod monitor;
/// Reset sequencing and the top-level run loop.
pub mod runner;
/// Signature region extraction and dumping.
pub mod signature;
/// VCD waveform recording.
pub mod trace;
