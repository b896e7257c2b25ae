//! Shutdown flag tests.
//!
//! These exercise the process-wide flag; the runner tests all poll local
//! flags, so setting the global one here cannot disturb them.

use cosim_core::sim::interrupt;

#[test]
fn request_is_sticky_until_cleared() {
    interrupt::clear();
    assert!(!interrupt::requested());

    interrupt::request();
    assert!(interrupt::requested());
    // Duplicate deliveries are harmless.
    interrupt::request();
    assert!(interrupt::requested());

    interrupt::clear();
    assert!(!interrupt::requested());
}
