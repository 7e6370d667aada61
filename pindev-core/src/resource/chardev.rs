//! Character device plumbing
//!
//! Device number, class, device file and char device registration, each
//! held by its own guard.

use alloc::sync::Arc;

use pindev_hal::{ClassId, DeviceChannel, DeviceNumber, DeviceRegistry};

use crate::config::DeviceNames;
use crate::error::{InitError, Stage};

struct NumberGuard<R: DeviceRegistry> {
    registry: R,
    dev: DeviceNumber,
}

impl<R: DeviceRegistry> Drop for NumberGuard<R> {
    fn drop(&mut self) {
        self.registry.unregister_device_number(self.dev);
    }
}

struct ClassGuard<R: DeviceRegistry> {
    registry: R,
    class: ClassId,
}

impl<R: DeviceRegistry> Drop for ClassGuard<R> {
    fn drop(&mut self) {
        self.registry.destroy_class(self.class);
    }
}

struct DeviceFileGuard<R: DeviceRegistry> {
    registry: R,
    class: ClassId,
    dev: DeviceNumber,
}

impl<R: DeviceRegistry> Drop for DeviceFileGuard<R> {
    fn drop(&mut self) {
        self.registry.destroy_device_file(self.class, self.dev);
    }
}

struct CdevGuard<R: DeviceRegistry> {
    registry: R,
    dev: DeviceNumber,
}

impl<R: DeviceRegistry> Drop for CdevGuard<R> {
    fn drop(&mut self) {
        self.registry.unregister_char_device(self.dev);
    }
}

/// A live device file backed by a [`DeviceChannel`]
///
/// Fields drop top to bottom: char device, device file, class, number.
pub struct CharDevice<R: DeviceRegistry + Clone> {
    _cdev: CdevGuard<R>,
    _file: DeviceFileGuard<R>,
    _class: ClassGuard<R>,
    number: NumberGuard<R>,
}

impl<R: DeviceRegistry + Clone> CharDevice<R> {
    /// Register `ops` under `names`
    ///
    /// The device is reachable from user space as soon as this returns.
    pub fn register(
        registry: &R,
        names: &DeviceNames,
        ops: Arc<dyn DeviceChannel>,
    ) -> Result<Self, InitError> {
        let dev = registry
            .register_device_number(&names.device)
            .map_err(|_| {
                log_error!("device nr could not be allocated");
                InitError::Allocation(Stage::DeviceNumber)
            })?;
        let number = NumberGuard {
            registry: registry.clone(),
            dev,
        };
        log_info!("{} - device nr. major: {}, minor: {}", names.device.as_str(), dev.major, dev.minor);

        let class = registry.create_class(&names.class).map_err(|_| {
            log_error!("device class cannot be created");
            InitError::Allocation(Stage::Class)
        })?;
        let class = ClassGuard {
            registry: registry.clone(),
            class,
        };

        registry
            .create_device_file(class.class, dev, &names.device)
            .map_err(|_| {
                log_error!("cannot create device file");
                InitError::Allocation(Stage::DeviceFile)
            })?;
        let file = DeviceFileGuard {
            registry: registry.clone(),
            class: class.class,
            dev,
        };

        registry.register_char_device(dev, ops).map_err(|_| {
            log_error!("registering of device to kernel failed");
            InitError::Allocation(Stage::CharDevice)
        })?;
        let cdev = CdevGuard {
            registry: registry.clone(),
            dev,
        };

        Ok(Self {
            _cdev: cdev,
            _file: file,
            _class: class,
            number,
        })
    }

    /// Device number the file is registered under
    pub fn number(&self) -> DeviceNumber {
        self.number.dev
    }
}
