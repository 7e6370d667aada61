//! Host simulation of the pindev HAL
//!
//! [`SimBoard`] implements every collaborator trait the drivers need:
//! - GPIO lines with ownership tracking and edge detection
//! - Interrupt dispatch on the thread that drives an input, serialised per
//!   line the way a masked interrupt would be
//! - A virtual millisecond clock for one-shot deadlines
//! - A device-file registry with an `open` surface for user-side calls
//! - Fault injection for every fallible collaborator call
//!
//! The board also records protocol violations (double release, release
//! of something never acquired) so tests can assert that drivers release
//! exactly what they took.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod chrdev;
pub mod fault;
pub mod gpio;
pub mod irq;
pub mod timer;

pub use chrdev::{FaultingReader, FaultingWriter, SimFile, FIRST_DYNAMIC_MAJOR};
pub use fault::Fault;
pub use gpio::{IRQ_BASE, SIM_GPIO_COUNT};
pub use timer::SimDeadline;

/// Lock a mutex, ignoring poisoning from a panicked test thread
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) pins: Mutex<gpio::PinTable>,
    pub(crate) irqs: Mutex<irq::IrqTable>,
    pub(crate) registry: Mutex<chrdev::RegistryState>,
    pub(crate) clock: timer::Clock,
    pub(crate) faults: Mutex<fault::FaultPlan>,
    pub(crate) violations: Mutex<Vec<String>>,
}

/// Simulated board
///
/// Cheap to clone; all clones share the same hardware.
#[derive(Clone, Default)]
pub struct SimBoard {
    pub(crate) shared: Arc<Shared>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fault` happen on every matching call until cleared
    pub fn inject(&self, fault: Fault) {
        lock(&self.shared.faults).insert(fault);
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        lock(&self.shared.faults).clear();
    }

    pub(crate) fn faulted(&self, fault: Fault) -> bool {
        lock(&self.shared.faults).contains(&fault)
    }

    pub(crate) fn violation(&self, what: String) {
        lock(&self.shared.violations).push(what);
    }

    /// Release-protocol violations seen so far
    pub fn violations(&self) -> Vec<String> {
        lock(&self.shared.violations).clone()
    }

    /// Check that nothing is held: no device numbers, classes, device
    /// files, char devices, owned pins, bound interrupts or pending
    /// deadlines
    pub fn is_idle(&self) -> bool {
        self.held_pins().is_empty()
            && self.bound_irqs().is_empty()
            && self.pending_deadlines() == 0
            && lock(&self.shared.registry).is_empty()
    }
}
