//! Types shared across the harness.

/// Error taxonomy and result alias.
pub mod error;

pub use error::{HarnessError, Result};
