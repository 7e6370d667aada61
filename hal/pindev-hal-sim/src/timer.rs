//! Virtual-time one-shot deadlines
//!
//! Time only moves when a test calls [`SimBoard::advance_ms`]. Expired
//! callbacks run on the advancing thread while the deadline's `running`
//! lock is held, so `cancel` waits for a callback already in progress.

use std::sync::{Arc, Mutex, Weak};

use pindev_hal::{DeadlineCallback, DeadlineTimer};

use crate::{lock, SimBoard};

#[derive(Default)]
pub(crate) struct Clock {
    now_ms: Mutex<u64>,
    slots: Mutex<Vec<Weak<TimerSlot>>>,
}

#[derive(Default)]
struct TimerSlot {
    due: Mutex<Option<(u64, Arc<dyn DeadlineCallback>)>>,
    running: Mutex<()>,
}

/// One-shot deadline on the board's virtual clock
pub struct SimDeadline {
    board: SimBoard,
    slot: Arc<TimerSlot>,
}

impl SimBoard {
    /// Create a deadline timer on the virtual clock
    pub fn deadline(&self) -> SimDeadline {
        let slot = Arc::new(TimerSlot::default());
        let mut slots = lock(&self.shared.clock.slots);
        slots.retain(|s| s.strong_count() > 0);
        slots.push(Arc::downgrade(&slot));
        SimDeadline {
            board: self.clone(),
            slot,
        }
    }

    /// Virtual milliseconds since the board was created
    pub fn now_ms(&self) -> u64 {
        *lock(&self.shared.clock.now_ms)
    }

    /// Move the virtual clock forward, firing every deadline that falls due
    pub fn advance_ms(&self, ms: u64) {
        let now = {
            let mut now = lock(&self.shared.clock.now_ms);
            *now += ms;
            *now
        };

        let slots: Vec<Arc<TimerSlot>> = lock(&self.shared.clock.slots)
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        for slot in slots {
            let _running = lock(&slot.running);
            let expired = {
                let mut due = lock(&slot.due);
                if matches!(due.as_ref(), Some((at, _)) if *at <= now) {
                    due.take()
                } else {
                    None
                }
            };
            if let Some((_, callback)) = expired {
                callback.expired();
            }
        }
    }

    /// Deadlines armed and not yet fired or cancelled
    pub fn pending_deadlines(&self) -> usize {
        lock(&self.shared.clock.slots)
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|slot| lock(&slot.due).is_some())
            .count()
    }
}

impl DeadlineTimer for SimDeadline {
    fn arm(&mut self, delay_ms: u32, callback: Arc<dyn DeadlineCallback>) {
        let at = self.board.now_ms() + u64::from(delay_ms);
        *lock(&self.slot.due) = Some((at, callback));
    }

    fn cancel(&mut self) -> bool {
        let _running = lock(&self.slot.running);
        lock(&self.slot.due).take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counter(AtomicU32);

    impl DeadlineCallback for Counter {
        fn expired(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_fires_once_at_deadline() {
        let board = SimBoard::new();
        let counter = Arc::new(Counter::default());
        let mut timer = board.deadline();

        timer.arm(1000, counter.clone());
        assert_eq!(board.pending_deadlines(), 1);

        board.advance_ms(999);
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        board.advance_ms(1);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(board.pending_deadlines(), 0);

        board.advance_ms(5000);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert!(!timer.cancel());
    }

    #[test]
    fn test_cancel_before_expiry() {
        let board = SimBoard::new();
        let counter = Arc::new(Counter::default());
        let mut timer = board.deadline();

        timer.arm(10, counter.clone());
        assert!(timer.cancel());
        board.advance_ms(100);
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    /// Callback that signals when it starts and takes a while to finish
    #[derive(Default)]
    struct Slow {
        started: AtomicBool,
        done: AtomicBool,
    }

    impl DeadlineCallback for Slow {
        fn expired(&self) {
            self.started.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(100));
            self.done.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_cancel_waits_for_running_callback() {
        let board = SimBoard::new();
        let slow = Arc::new(Slow::default());
        let mut timer = board.deadline();
        timer.arm(10, slow.clone());

        std::thread::scope(|s| {
            s.spawn(|| board.advance_ms(10));

            while !slow.started.load(Ordering::SeqCst) {
                std::thread::yield_now();
            }
            // Already fired, so nothing was pending
            assert!(!timer.cancel());
            assert!(slow.done.load(Ordering::SeqCst));
        });
    }

    #[test]
    fn test_dropped_timer_is_forgotten() {
        let board = SimBoard::new();
        {
            let mut timer = board.deadline();
            timer.arm(10, Arc::new(Counter::default()));
        }
        assert_eq!(board.pending_deadlines(), 0);
    }
}
