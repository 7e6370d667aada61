//! GPIO line abstractions
//!
//! Pins are addressed by a platform-wide number, acquired with a label,
//! configured once and released once. The controller is shared between
//! user context and interrupt context, so every method takes `&self`.

use crate::irq::{IrqError, IrqNumber};

/// Platform-wide GPIO number
pub type PinId = u32;

/// Line direction, fixed when the line is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Line is sampled
    Input,
    /// Line is driven
    Output,
}

/// Errors reported by pin acquisition and configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin is already owned by someone else
    Busy,
    /// Pin number does not exist on this controller
    InvalidPin,
    /// Direction could not be applied
    ConfigFailed,
}

/// GPIO controller
///
/// `set_value` and `get_value` must be callable from interrupt and
/// deadline context: no allocation and no sleeping.
pub trait GpioController {
    /// Take exclusive ownership of a pin
    fn acquire(&self, pin: PinId, label: &str) -> Result<(), GpioError>;

    /// Configure an acquired pin as input
    fn direction_input(&self, pin: PinId) -> Result<(), GpioError>;

    /// Configure an acquired pin as output, driving `initial` immediately
    fn direction_output(&self, pin: PinId, initial: bool) -> Result<(), GpioError>;

    /// Drive an output pin
    fn set_value(&self, pin: PinId, high: bool);

    /// Sample a pin (for outputs this is the driven level)
    fn get_value(&self, pin: PinId) -> bool;

    /// Give a pin back
    fn release(&self, pin: PinId);

    /// Map a pin to the interrupt line that reports its edges
    fn resolve_irq(&self, pin: PinId) -> Result<IrqNumber, IrqError>;
}
