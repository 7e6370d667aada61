//! Simulated device-file registry
//!
//! Hands out device numbers from major 240 upwards, keeps classes and
//! device files by name, and lets tests open a device file to issue
//! user-side reads and writes against the registered channel.

use std::collections::HashMap;
use std::sync::Arc;

use pindev_hal::{
    AllocationFailure, ClassId, DeviceChannel, DeviceNumber, DeviceRegistry, UserReader,
    UserWriter,
};

use crate::{lock, Fault, SimBoard};

/// First dynamically allocated major number
pub const FIRST_DYNAMIC_MAJOR: u32 = 240;

pub(crate) struct RegistryState {
    next_major: u32,
    next_class: u32,
    numbers: HashMap<DeviceNumber, String>,
    classes: HashMap<ClassId, String>,
    files: HashMap<DeviceNumber, (ClassId, String)>,
    cdevs: HashMap<DeviceNumber, Arc<dyn DeviceChannel>>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            next_major: FIRST_DYNAMIC_MAJOR,
            next_class: 1,
            numbers: HashMap::new(),
            classes: HashMap::new(),
            files: HashMap::new(),
            cdevs: HashMap::new(),
        }
    }
}

impl RegistryState {
    pub(crate) fn is_empty(&self) -> bool {
        self.numbers.is_empty()
            && self.classes.is_empty()
            && self.files.is_empty()
            && self.cdevs.is_empty()
    }
}

impl SimBoard {
    /// Open a device file by name
    ///
    /// Returns `None` if no such file exists or no char device backs it.
    pub fn open(&self, name: &str) -> Option<SimFile> {
        let ops = {
            let registry = lock(&self.shared.registry);
            let dev = registry
                .files
                .iter()
                .find(|(_, (_, file))| file == name)
                .map(|(dev, _)| *dev)?;
            registry.cdevs.get(&dev).cloned()?
        };
        ops.open();
        Some(SimFile { ops })
    }

    /// Names of the device files that exist
    pub fn device_files(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.shared.registry)
            .files
            .values()
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Names of the classes that exist
    pub fn classes(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.shared.registry).classes.values().cloned().collect();
        names.sort();
        names
    }
}

impl DeviceRegistry for SimBoard {
    fn register_device_number(&self, name: &str) -> Result<DeviceNumber, AllocationFailure> {
        if self.faulted(Fault::DeviceNumber) {
            return Err(AllocationFailure);
        }
        let mut registry = lock(&self.shared.registry);
        let dev = DeviceNumber::new(registry.next_major, 0);
        registry.next_major += 1;
        registry.numbers.insert(dev, name.to_string());
        Ok(dev)
    }

    fn unregister_device_number(&self, dev: DeviceNumber) {
        if lock(&self.shared.registry).numbers.remove(&dev).is_none() {
            self.violation(format!("unregister of unknown device number {:?}", dev));
        }
    }

    fn create_class(&self, name: &str) -> Result<ClassId, AllocationFailure> {
        if self.faulted(Fault::Class) {
            return Err(AllocationFailure);
        }
        let mut registry = lock(&self.shared.registry);
        if registry.classes.values().any(|c| c == name) {
            return Err(AllocationFailure);
        }
        let class = ClassId(registry.next_class);
        registry.next_class += 1;
        registry.classes.insert(class, name.to_string());
        Ok(class)
    }

    fn destroy_class(&self, class: ClassId) {
        if lock(&self.shared.registry).classes.remove(&class).is_none() {
            self.violation(format!("destroy of unknown class {:?}", class));
        }
    }

    fn create_device_file(
        &self,
        class: ClassId,
        dev: DeviceNumber,
        name: &str,
    ) -> Result<(), AllocationFailure> {
        if self.faulted(Fault::DeviceFile) {
            return Err(AllocationFailure);
        }
        let mut registry = lock(&self.shared.registry);
        let known = registry.classes.contains_key(&class) && registry.numbers.contains_key(&dev);
        let taken = registry.files.contains_key(&dev)
            || registry.files.values().any(|(_, file)| file == name);
        if !known || taken {
            return Err(AllocationFailure);
        }
        registry.files.insert(dev, (class, name.to_string()));
        Ok(())
    }

    fn destroy_device_file(&self, class: ClassId, dev: DeviceNumber) {
        let removed = {
            let mut registry = lock(&self.shared.registry);
            let owned = matches!(registry.files.get(&dev), Some((owner, _)) if *owner == class);
            owned && registry.files.remove(&dev).is_some()
        };
        if !removed {
            self.violation(format!("destroy of unknown device file {:?}", dev));
        }
    }

    fn register_char_device(
        &self,
        dev: DeviceNumber,
        ops: Arc<dyn DeviceChannel>,
    ) -> Result<(), AllocationFailure> {
        if self.faulted(Fault::CharDevice) {
            return Err(AllocationFailure);
        }
        let mut registry = lock(&self.shared.registry);
        if registry.cdevs.contains_key(&dev) {
            return Err(AllocationFailure);
        }
        registry.cdevs.insert(dev, ops);
        Ok(())
    }

    fn unregister_char_device(&self, dev: DeviceNumber) {
        if lock(&self.shared.registry).cdevs.remove(&dev).is_none() {
            self.violation(format!("unregister of unknown char device {:?}", dev));
        }
    }
}

/// An open device file
///
/// Holds the channel open until dropped, like a user-space file
/// descriptor.
pub struct SimFile {
    ops: Arc<dyn DeviceChannel>,
}

impl SimFile {
    /// Read up to `len` bytes
    pub fn read(&self, len: usize) -> Vec<u8> {
        self.read_faulting(len, usize::MAX)
    }

    /// Read up to `len` bytes into a user buffer that faults after
    /// `valid` bytes
    pub fn read_faulting(&self, len: usize, valid: usize) -> Vec<u8> {
        let mut out = FaultingWriter::new(len, valid);
        let n = self.ops.read(&mut out);
        out.into_bytes(n)
    }

    /// Write `bytes`, returning the count the channel accepted
    pub fn write(&self, bytes: &[u8]) -> usize {
        self.write_faulting(bytes, usize::MAX)
    }

    /// Write `bytes` from a user buffer that faults after `valid` bytes
    pub fn write_faulting(&self, bytes: &[u8], valid: usize) -> usize {
        self.ops.write(&mut FaultingReader::new(bytes, valid))
    }
}

impl Drop for SimFile {
    fn drop(&mut self) {
        self.ops.release();
    }
}

/// User destination buffer whose first `valid` bytes are mapped
pub struct FaultingWriter {
    buf: Vec<u8>,
    valid: usize,
}

impl FaultingWriter {
    pub fn new(len: usize, valid: usize) -> Self {
        Self {
            buf: vec![0; len],
            valid,
        }
    }

    /// The first `n` bytes of the buffer
    pub fn into_bytes(mut self, n: usize) -> Vec<u8> {
        self.buf.truncate(n);
        self.buf
    }
}

impl UserWriter for FaultingWriter {
    fn len(&self) -> usize {
        self.buf.len()
    }

    fn copy_to_user(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.buf.len()).min(self.valid);
        self.buf[..n].copy_from_slice(&src[..n]);
        src.len() - n
    }
}

/// User source buffer whose first `valid` bytes are mapped
pub struct FaultingReader<'a> {
    bytes: &'a [u8],
    valid: usize,
}

impl<'a> FaultingReader<'a> {
    pub fn new(bytes: &'a [u8], valid: usize) -> Self {
        Self { bytes, valid }
    }
}

impl UserReader for FaultingReader<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn copy_from_user(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.bytes.len()).min(self.valid);
        dst[..n].copy_from_slice(&self.bytes[..n]);
        dst.len() - n
    }
}
