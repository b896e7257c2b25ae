//! Cycle-stepping co-simulation harness library.
//!
//! This crate drives a clock-and-reset sequenced hardware model and observes
//! its memory-mapped bus. It performs:
//! 1. **Sequencing:** Clock generation and timed reset release.
//! 2. **Loading:** Program image injection into model memory (h32 or raw binary).
//! 3. **Monitoring:** Per-edge bus predicates for completion, host-out bytes,
//!    and UART transmit pacing.
//! 4. **Extraction:** Signature memory dumps and VCD waveform traces.
//! 5. **Termination:** Cycle limits, completion writes, and interrupt-requested
//!    shutdown, all converging on one idempotent cleanup path.
//!
//! The hardware model itself is external: the harness only talks to the narrow
//! [`Dut`] interface and never reaches into model internals.

/// Shared error types.
pub mod common;
/// Run configuration (defaults, image formats, serde structures).
pub mod config;
/// The model-facing interface and a behavioral stand-in model.
pub mod model;
/// Simulation machinery (clock, loader, monitors, trace, run loop).
pub mod sim;

/// Run configuration; build from CLI flags or deserialize from JSON.
pub use crate::config::RunConfig;
/// Narrow interface every steppable model implements.
pub use crate::model::Dut;
/// Top-level harness; owns the model, clock, trace, and monitors.
pub use crate::sim::runner::{ExitReason, Harness};
