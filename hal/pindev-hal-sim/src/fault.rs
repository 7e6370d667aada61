//! Fault injection

use std::collections::HashSet;

use pindev_hal::{IrqNumber, PinId};

/// A collaborator call that should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// `register_device_number`
    DeviceNumber,
    /// `create_class`
    Class,
    /// `create_device_file`
    DeviceFile,
    /// `register_char_device`
    CharDevice,
    /// `acquire` on this pin reports busy
    Acquire(PinId),
    /// `direction_input`/`direction_output` on this pin
    Direction(PinId),
    /// `resolve_irq` on this pin
    IrqMapping(PinId),
    /// `register_edge_handler` on this irq
    IrqRequest(IrqNumber),
}

pub(crate) type FaultPlan = HashSet<Fault>;
