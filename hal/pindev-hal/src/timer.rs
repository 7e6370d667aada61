//! One-shot deadline
//!
//! A deadline fires its callback once, `delay_ms` after it was armed.

use alloc::sync::Arc;

/// Deadline expiry callback
///
/// Runs in timer context: must not allocate or block.
pub trait DeadlineCallback: Send + Sync {
    /// Called once when the deadline passes
    fn expired(&self);
}

/// One-shot deadline timer
pub trait DeadlineTimer {
    /// Arm the deadline `delay_ms` from now
    ///
    /// Arming an already pending deadline replaces it.
    fn arm(&mut self, delay_ms: u32, callback: Arc<dyn DeadlineCallback>);

    /// Disarm the deadline
    ///
    /// Returns `true` if the deadline was still pending. If the callback is
    /// running when this is called, waits for it to return first.
    fn cancel(&mut self) -> bool;
}
