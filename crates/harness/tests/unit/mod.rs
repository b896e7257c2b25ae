//! Unit tests for the harness components.

/// Process-wide shutdown flag.
pub mod interrupt;
/// Image parsing and injection.
pub mod loader;
/// Bus event monitor predicates.
pub mod monitor;
