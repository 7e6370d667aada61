//! LED toggle flag
//!
//! `light_on` is mutated from two contexts: the button edge handler flips
//! it, user writes set it. Each mutation hands the new value to an `apply`
//! closure (which drives the LED) inside the same critical section, so the
//! flag and the line can only disagree while a mutation is in progress.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Logical LED state shared between interrupt and user context
pub struct ToggleState {
    light_on: Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ToggleState {
    /// Create the flag with an initial value
    pub const fn new(initial: bool) -> Self {
        Self {
            light_on: Mutex::new(Cell::new(initial)),
        }
    }

    /// Invert the flag and apply the result
    ///
    /// Returns the new value. Safe to call from interrupt context as long
    /// as `apply` does not block.
    pub fn flip(&self, apply: impl FnOnce(bool)) -> bool {
        self.light_on.lock(|cell| {
            let on = !cell.get();
            apply(on);
            cell.set(on);
            on
        })
    }

    /// Set the flag to `on` and apply it
    pub fn set(&self, on: bool, apply: impl FnOnce(bool)) {
        self.light_on.lock(|cell| {
            apply(on);
            cell.set(on);
        });
    }

    /// Set the flag to `on` if `apply` takes it
    ///
    /// `apply` returns whether it applied the value; the flag only changes
    /// when it did. Returns the same.
    pub fn try_set(&self, on: bool, apply: impl FnOnce(bool) -> bool) -> bool {
        self.light_on.lock(|cell| {
            let applied = apply(on);
            if applied {
                cell.set(on);
            }
            applied
        })
    }

    /// Current value of the flag
    pub fn is_on(&self) -> bool {
        self.light_on.lock(|cell| cell.get())
    }

    /// Run `f` with the flag held, so whatever it samples cannot be torn
    /// by a concurrent flip
    pub fn observe<T>(&self, f: impl FnOnce(bool) -> T) -> T {
        self.light_on.lock(|cell| f(cell.get()))
    }
}
