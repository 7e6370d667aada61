//! Init error taxonomy
//!
//! Every variant is fatal to driver load. Short transfers are not errors
//! and never appear here.

use pindev_hal::{IrqError, PinId};

/// Registration step that failed to allocate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    DeviceNumber,
    Class,
    DeviceFile,
    CharDevice,
}

/// Why a driver failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Device number, class, device file or char device registration failed
    Allocation(Stage),
    /// GPIO line owned by someone else (or not present)
    PinBusy(PinId),
    /// GPIO line could not be configured
    PinConfig(PinId),
    /// Interrupt line could not be resolved or bound
    InterruptBinding(IrqError),
}

impl From<IrqError> for InitError {
    fn from(e: IrqError) -> Self {
        InitError::InterruptBinding(e)
    }
}
