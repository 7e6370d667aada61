//! Timer auto-off driver
//!
//! The LED is switched on at load and a one-shot deadline switches it off
//! again `delay_ms` later. The deadline is never rearmed.
//!
//! The device file is unrelated to the LED: it echoes back whatever was
//! last written to it, up to [`ECHO_BUFFER_LEN`] bytes.

use alloc::sync::Arc;

use pindev_core::config::{AutoOffConfig, ECHO_BUFFER_LEN};
use pindev_core::resource::{ArmedDeadline, CharDevice, GpioLine, PinClaim};
use pindev_core::state::WriteBuffer;
use pindev_core::transfer::{copy_in, copy_out};
use pindev_core::{log_debug, log_info, InitError};
use pindev_hal::{
    DeadlineCallback, DeadlineTimer, DeviceChannel, DeviceNumber, DeviceRegistry,
    GpioController, PinId, UserReader, UserWriter,
};
use portable_atomic::{AtomicBool, Ordering};

/// Echo device file operations
#[derive(Default)]
pub struct EchoChannel {
    buffer: WriteBuffer<ECHO_BUFFER_LEN>,
}

impl EchoChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceChannel for EchoChannel {
    fn open(&self) {
        log_debug!("dev_nr open was called");
    }

    fn release(&self) {
        log_debug!("dev_nr close was called");
    }

    fn read(&self, out: &mut dyn UserWriter) -> usize {
        let content = self.buffer.snapshot();
        copy_out(out, &content)
    }

    fn write(&self, input: &mut dyn UserReader) -> usize {
        // Copy from user space before taking the buffer lock
        let mut staged = [0u8; ECHO_BUFFER_LEN];
        let copied = copy_in(input, &mut staged);
        self.buffer.store(&staged[..copied])
    }
}

/// Deadline callback that forces the LED off
pub struct LedCutoff<G: GpioController> {
    gpio: G,
    pin: PinId,
    fired: AtomicBool,
}

impl<G: GpioController> LedCutoff<G> {
    pub fn new(gpio: G, pin: PinId) -> Self {
        Self {
            gpio,
            pin,
            fired: AtomicBool::new(false),
        }
    }

    /// Check if the deadline has fired
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl<G: GpioController + Send + Sync> DeadlineCallback for LedCutoff<G> {
    fn expired(&self) {
        self.gpio.set_value(self.pin, false);
        self.fired.store(true, Ordering::Release);
        log_info!("led out");
    }
}

/// Loaded timer auto-off driver
///
/// Fields drop top to bottom: the deadline is cancelled (waiting for a
/// running callback) before the LED line is driven low and released, then
/// the device file plumbing goes.
pub struct TimerAutoOffDriver<G, R, T>
where
    G: GpioController + Clone + Send + Sync + 'static,
    R: DeviceRegistry + Clone,
    T: DeadlineTimer,
{
    _deadline: ArmedDeadline<T>,
    led: GpioLine<G>,
    chardev: CharDevice<R>,
    cutoff: Arc<LedCutoff<G>>,
}

impl<G, R, T> TimerAutoOffDriver<G, R, T>
where
    G: GpioController + Clone + Send + Sync + 'static,
    R: DeviceRegistry + Clone,
    T: DeadlineTimer,
{
    /// Load the driver, switching the LED on and arming `timer`
    ///
    /// On failure everything acquired so far has been released (and the
    /// timer never armed) by the time this returns.
    pub fn load(config: &AutoOffConfig, gpio: &G, registry: &R, timer: T) -> Result<Self, InitError> {
        log_info!("loading {}", config.names.device.as_str());

        let chardev = CharDevice::register(registry, &config.names, Arc::new(EchoChannel::new()))?;

        let led = PinClaim::acquire(gpio, &config.led)?.into_output(false)?;
        led.set(true);

        let cutoff = Arc::new(LedCutoff::new(gpio.clone(), led.pin()));
        let deadline = ArmedDeadline::arm(timer, config.delay_ms, cutoff.clone());

        log_info!("kernel timer init");
        Ok(Self {
            _deadline: deadline,
            led,
            chardev,
            cutoff,
        })
    }

    /// Device number of the device file
    pub fn device_number(&self) -> DeviceNumber {
        self.chardev.number()
    }

    /// Check if the auto-off deadline has fired
    pub fn expired(&self) -> bool {
        self.cutoff.has_fired()
    }

    /// Current LED level
    pub fn led_level(&self) -> bool {
        self.led.get()
    }
}

impl<G, R, T> Drop for TimerAutoOffDriver<G, R, T>
where
    G: GpioController + Clone + Send + Sync + 'static,
    R: DeviceRegistry + Clone,
    T: DeadlineTimer,
{
    fn drop(&mut self) {
        log_info!("kernel timer exit (expired: {})", self.cutoff.has_fired());
    }
}
