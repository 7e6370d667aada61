//! Configuration type definitions
//!
//! One config struct per driver. The defaults describe the reference
//! board: a Raspberry Pi with the LED on header GPIO 21, the button on
//! GPIO 14 and the auto-off LED on GPIO 20 (global numbers offset by the
//! SoC's GPIO base of 571).

use heapless::String;

use pindev_hal::PinId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of device, class, label and irq names
pub const MAX_NAME_LEN: usize = 32;

/// Capacity of the auto-off echo buffer
pub const ECHO_BUFFER_LEN: usize = 255;

/// Default auto-off delay
pub const DEFAULT_AUTO_OFF_MS: u32 = 1000;

/// Name type used across all configs
pub type Name = String<MAX_NAME_LEN>;

/// Build a [`Name`], truncating anything past [`MAX_NAME_LEN`]
pub fn name(s: &str) -> Name {
    let mut out = Name::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Device file names shared by both drivers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceNames {
    /// Device number region and device file name
    pub device: Name,
    /// Device class name
    pub class: Name,
}

/// A GPIO line and the label it is requested under
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineConfig {
    /// Global GPIO number
    pub pin: PinId,
    /// Consumer label
    pub label: Name,
}

impl LineConfig {
    pub fn new(pin: PinId, label: &str) -> Self {
        Self {
            pin,
            label: name(label),
        }
    }
}

/// Interrupt toggle driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToggleConfig {
    pub names: DeviceNames,
    /// Output line driving the LED
    pub led: LineConfig,
    /// Input line wired to the push-button
    pub button: LineConfig,
    /// Name the edge handler is registered under
    pub irq_name: Name,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            names: DeviceNames {
                device: name("gpio_driver"),
                class: name("dummy_class"),
            },
            led: LineConfig::new(592, "rpi-gpio-21"),
            button: LineConfig::new(585, "rpi-gpio-14"),
            irq_name: name("button_handler"),
        }
    }
}

impl ToggleConfig {
    /// Use a different LED line
    pub fn with_led(mut self, pin: PinId, label: &str) -> Self {
        self.led = LineConfig::new(pin, label);
        self
    }

    /// Use a different button line
    pub fn with_button(mut self, pin: PinId, label: &str) -> Self {
        self.button = LineConfig::new(pin, label);
        self
    }

    /// Use different device and class names
    pub fn with_names(mut self, device: &str, class: &str) -> Self {
        self.names = DeviceNames {
            device: name(device),
            class: name(class),
        };
        self
    }
}

/// Timer auto-off driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutoOffConfig {
    pub names: DeviceNames,
    /// Output line driving the LED
    pub led: LineConfig,
    /// Time from load until the LED is forced off (ms)
    pub delay_ms: u32,
}

impl Default for AutoOffConfig {
    fn default() -> Self {
        Self {
            names: DeviceNames {
                device: name("my_timer_driver"),
                class: name("dummy"),
            },
            led: LineConfig::new(591, "gpio-25-led"),
            delay_ms: DEFAULT_AUTO_OFF_MS,
        }
    }
}

impl AutoOffConfig {
    /// Use a different LED line
    pub fn with_led(mut self, pin: PinId, label: &str) -> Self {
        self.led = LineConfig::new(pin, label);
        self
    }

    /// Use different device and class names
    pub fn with_names(mut self, device: &str, class: &str) -> Self {
        self.names = DeviceNames {
            device: name(device),
            class: name(class),
        };
        self
    }

    /// Use a different auto-off delay
    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}
