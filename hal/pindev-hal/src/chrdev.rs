//! Character device registration
//!
//! A driver becomes reachable from user space in four steps: a device
//! number is allocated, a device class is created, a device file is
//! created in that class, and the file operations are registered against
//! the number. Each step has a matching release call.

use alloc::sync::Arc;

use crate::uaccess::{UserReader, UserWriter};

/// Major/minor device number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceNumber {
    pub major: u32,
    pub minor: u32,
}

impl DeviceNumber {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

/// Handle to a created device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassId(pub u32);

/// A registration step could not allocate its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocationFailure;

/// File operations behind a device file
///
/// `read` and `write` report how many bytes were actually transferred.
/// A copy fault shortens the count; it is never an error.
pub trait DeviceChannel: Send + Sync {
    /// Device file opened
    fn open(&self);

    /// Device file closed
    fn release(&self);

    /// Fill `out` with at most `out.len()` bytes of driver state
    fn read(&self, out: &mut dyn UserWriter) -> usize;

    /// Consume at most `input.len()` bytes
    fn write(&self, input: &mut dyn UserReader) -> usize;
}

/// Device-file registry
///
/// Callers release exactly what they acquired, once.
pub trait DeviceRegistry {
    /// Allocate a device number for `name`
    fn register_device_number(&self, name: &str) -> Result<DeviceNumber, AllocationFailure>;

    /// Give a device number back
    fn unregister_device_number(&self, dev: DeviceNumber);

    /// Create a device class
    fn create_class(&self, name: &str) -> Result<ClassId, AllocationFailure>;

    /// Destroy a device class
    fn destroy_class(&self, class: ClassId);

    /// Create the device file `name` for `dev` inside `class`
    fn create_device_file(
        &self,
        class: ClassId,
        dev: DeviceNumber,
        name: &str,
    ) -> Result<(), AllocationFailure>;

    /// Remove the device file for `dev`
    fn destroy_device_file(&self, class: ClassId, dev: DeviceNumber);

    /// Attach file operations to `dev`; the device is live once this returns
    fn register_char_device(
        &self,
        dev: DeviceNumber,
        ops: Arc<dyn DeviceChannel>,
    ) -> Result<(), AllocationFailure>;

    /// Detach the file operations from `dev`
    fn unregister_char_device(&self, dev: DeviceNumber);
}
