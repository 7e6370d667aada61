//! Armed one-shot deadline

use alloc::sync::Arc;

use pindev_hal::{DeadlineCallback, DeadlineTimer};

/// A one-shot deadline that is cancelled when dropped
///
/// Cancellation is synchronous: once the drop returns, the callback is
/// neither pending nor running, so resources it touches can be released.
pub struct ArmedDeadline<T: DeadlineTimer> {
    timer: T,
}

impl<T: DeadlineTimer> ArmedDeadline<T> {
    /// Arm `timer` to call `callback` after `delay_ms`
    pub fn arm(mut timer: T, delay_ms: u32, callback: Arc<dyn DeadlineCallback>) -> Self {
        timer.arm(delay_ms, callback);
        log_debug!("deadline armed for {} ms", delay_ms);
        Self { timer }
    }
}

impl<T: DeadlineTimer> Drop for ArmedDeadline<T> {
    fn drop(&mut self) {
        if self.timer.cancel() {
            log_debug!("deadline cancelled before expiry");
        } else {
            log_debug!("deadline already expired");
        }
    }
}
