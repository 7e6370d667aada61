//! Interrupt toggle driver
//!
//! A push-button on an input line toggles an LED on an output line. The
//! button's rising edge raises an interrupt; the handler flips `light_on`
//! and drives the LED to match. The device file reports the LED level as
//! `"0\n"` or `"1\n"` and accepts a single `'0'` or `'1'` to force it.
//!
//! # Load order
//!
//! device number → class → device file → char device → LED (output, low)
//! → button (input) → irq resolve → rising-edge handler. Teardown is the
//! exact reverse and is driven by the field order of
//! [`InterruptToggleDriver`].

use alloc::sync::Arc;

use pindev_core::config::ToggleConfig;
use pindev_core::resource::{CharDevice, GpioLine, IrqRegistration, PinClaim};
use pindev_core::state::ToggleState;
use pindev_core::transfer::{copy_in, copy_out};
use pindev_core::{log_debug, log_info, InitError};
use pindev_hal::{
    DeviceChannel, DeviceNumber, DeviceRegistry, Edge, EdgeHandler, GpioController,
    InterruptController, IrqNumber, IrqReturn, PinId, UserReader, UserWriter,
};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Device file operations and edge handler of the toggle driver
///
/// Shared between the registry (user calls) and the interrupt controller
/// (edges). All LED writes go through [`ToggleState`], so a flip and a
/// user command never interleave.
pub struct ToggleChannel<G: GpioController> {
    gpio: G,
    led: PinId,
    button: PinId,
    state: ToggleState,
    /// Edges serviced since load
    edges: AtomicU32,
    /// Set at unload; commands no longer reach the LED line
    retired: AtomicBool,
}

impl<G: GpioController> ToggleChannel<G> {
    /// Create the channel for an LED and a button line
    ///
    /// The LED starts (logically) off.
    pub fn new(gpio: G, led: PinId, button: PinId) -> Self {
        Self {
            gpio,
            led,
            button,
            state: ToggleState::new(false),
            edges: AtomicU32::new(0),
            retired: AtomicBool::new(false),
        }
    }

    /// Force the LED on or off
    ///
    /// Ignored once the channel is retired.
    pub fn set_light(&self, on: bool) {
        let applied = self.state.try_set(on, |on| {
            if self.retired.load(Ordering::Acquire) {
                return false;
            }
            self.gpio.set_value(self.led, on);
            true
        });
        if !applied {
            log_debug!("ignoring command during unload");
        }
    }

    /// Stop applying user commands to the LED line
    ///
    /// Serialised with [`set_light`](Self::set_light), so no command
    /// reaches the line after this returns.
    pub fn retire(&self) {
        self.state.observe(|_| self.retired.store(true, Ordering::Release));
    }

    /// Check that the LED line matches the logical state
    ///
    /// Both are sampled inside the same critical section.
    pub fn led_in_sync(&self) -> bool {
        self.state.observe(|on| self.gpio.get_value(self.led) == on)
    }

    /// Logical LED state
    pub fn light_on(&self) -> bool {
        self.state.is_on()
    }

    /// LED level as applied to the line
    pub fn led_level(&self) -> bool {
        self.state.observe(|_| self.gpio.get_value(self.led))
    }

    /// Number of edges handled
    pub fn edge_count(&self) -> u32 {
        self.edges.load(Ordering::Relaxed)
    }
}

impl<G: GpioController + Send + Sync> DeviceChannel for ToggleChannel<G> {
    fn open(&self) {
        log_debug!("dev_nr open was called");
    }

    fn release(&self) {
        log_debug!("dev_nr close was called");
    }

    fn read(&self, out: &mut dyn UserWriter) -> usize {
        let led = self.led_level();
        log_debug!("value of led: {}", led as u8);
        log_debug!("button state: {}", self.gpio.get_value(self.button) as u8);

        let report = [b'0' + led as u8, b'\n'];
        copy_out(out, &report)
    }

    fn write(&self, input: &mut dyn UserReader) -> usize {
        let mut value = [0u8; 1];
        let copied = copy_in(input, &mut value);
        if copied == 0 {
            return 0;
        }

        match value[0] {
            b'0' => self.set_light(false),
            b'1' => self.set_light(true),
            other => log_debug!("ignoring command byte {}", other),
        }
        copied
    }
}

impl<G: GpioController + Send + Sync> EdgeHandler for ToggleChannel<G> {
    fn handle(&self, _irq: IrqNumber) -> IrqReturn {
        let on = self.state.flip(|on| self.gpio.set_value(self.led, on));
        self.edges.fetch_add(1, Ordering::Relaxed);
        log_info!("GPIO Interrupt! LED is now {}", if on { "ON" } else { "OFF" });
        IrqReturn::Handled
    }
}

/// Loaded interrupt toggle driver
///
/// Fields drop top to bottom, which is the teardown order: handler,
/// button, LED (driven low), then the device file plumbing.
pub struct InterruptToggleDriver<G, I, R>
where
    G: GpioController + Clone + Send + Sync + 'static,
    I: InterruptController + Clone,
    R: DeviceRegistry + Clone,
{
    irq: IrqRegistration<I>,
    _button: GpioLine<G>,
    _led: GpioLine<G>,
    chardev: CharDevice<R>,
    channel: Arc<ToggleChannel<G>>,
}

impl<G, I, R> InterruptToggleDriver<G, I, R>
where
    G: GpioController + Clone + Send + Sync + 'static,
    I: InterruptController + Clone,
    R: DeviceRegistry + Clone,
{
    /// Load the driver
    ///
    /// On failure everything acquired so far has been released by the
    /// time this returns.
    pub fn load(config: &ToggleConfig, gpio: &G, ctrl: &I, registry: &R) -> Result<Self, InitError> {
        log_info!("loading {}", config.names.device.as_str());

        let channel = Arc::new(ToggleChannel::new(
            gpio.clone(),
            config.led.pin,
            config.button.pin,
        ));

        let chardev = CharDevice::register(registry, &config.names, channel.clone())?;

        let led = PinClaim::acquire(gpio, &config.led)?.into_output(false)?;
        let button = PinClaim::acquire(gpio, &config.button)?.into_input()?;

        let irq = IrqRegistration::request(
            ctrl,
            &button,
            Edge::Rising,
            &config.irq_name,
            channel.clone(),
        )?;

        log_info!("{} ready on irq {}", config.names.device.as_str(), irq.irq());
        Ok(Self {
            irq,
            _button: button,
            _led: led,
            chardev,
            channel,
        })
    }

    /// Device number of the device file
    pub fn device_number(&self) -> DeviceNumber {
        self.chardev.number()
    }

    /// Interrupt the button is bound to
    pub fn irq(&self) -> IrqNumber {
        self.irq.irq()
    }

    /// Logical LED state
    pub fn light_on(&self) -> bool {
        self.channel.light_on()
    }

    /// LED level as applied to the line
    pub fn led_level(&self) -> bool {
        self.channel.led_level()
    }

    /// Number of button edges handled since load
    pub fn edge_count(&self) -> u32 {
        self.channel.edge_count()
    }

    /// Check that the LED level and `light_on` agree
    pub fn led_in_sync(&self) -> bool {
        self.channel.led_in_sync()
    }
}

impl<G, I, R> Drop for InterruptToggleDriver<G, I, R>
where
    G: GpioController + Clone + Send + Sync + 'static,
    I: InterruptController + Clone,
    R: DeviceRegistry + Clone,
{
    fn drop(&mut self) {
        log_info!("unloading gpio driver (irq {})", self.irq.irq());
        // The device file outlives the LED line during teardown
        self.channel.retire();
    }
}
