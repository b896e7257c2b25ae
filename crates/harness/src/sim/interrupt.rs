//! Process-wide shutdown flag.
//!
//! An asynchronous termination signal must not touch the model or the trace
//! writer directly: the handler could land in the middle of a dump. Instead
//! the handler calls [`request`], which only performs an atomic store, and
//! the run loop polls [`requested`] once per iteration and performs cleanup
//! from ordinary control flow. Repeated deliveries are harmless.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Requests shutdown. Async-signal-safe: a single atomic store.
pub fn request() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Whether shutdown has been requested.
pub fn requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Re-arms the flag.
///
/// Call before reusing the harness for another run in the same process; a
/// flag left over from a previous run would stop the next one immediately.
pub fn clear() {
    SHUTDOWN.store(false, Ordering::SeqCst);
}
