//! GPIO line ownership
//!
//! A [`PinClaim`] is an acquired pin with no direction yet. Configuring it
//! consumes the claim and yields a [`GpioLine`] whose direction can no
//! longer change. If configuration fails the claim is dropped, which
//! releases the pin.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
use pindev_hal::{Direction, GpioController, IrqError, IrqNumber, PinId};

use crate::config::LineConfig;
use crate::error::InitError;

/// An acquired, unconfigured pin
pub struct PinClaim<G: GpioController> {
    gpio: G,
    pin: PinId,
}

impl<G: GpioController> PinClaim<G> {
    /// Acquire the pin described by `line`
    pub fn acquire(gpio: &G, line: &LineConfig) -> Result<Self, InitError>
    where
        G: Clone,
    {
        gpio.acquire(line.pin, &line.label).map_err(|e| {
            log_error!("cannot allocate gpio {} ({:?})", line.pin, e);
            InitError::PinBusy(line.pin)
        })?;
        Ok(Self {
            gpio: gpio.clone(),
            pin: line.pin,
        })
    }

    /// Pin number
    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Configure as output driving `initial`
    pub fn into_output(self, initial: bool) -> Result<GpioLine<G>, InitError> {
        if let Err(e) = self.gpio.direction_output(self.pin, initial) {
            log_error!("cannot set gpio {} to output ({:?})", self.pin, e);
            return Err(InitError::PinConfig(self.pin));
        }
        Ok(GpioLine {
            claim: self,
            direction: Direction::Output,
        })
    }

    /// Configure as input
    pub fn into_input(self) -> Result<GpioLine<G>, InitError> {
        if let Err(e) = self.gpio.direction_input(self.pin) {
            log_error!("cannot set gpio {} to input ({:?})", self.pin, e);
            return Err(InitError::PinConfig(self.pin));
        }
        Ok(GpioLine {
            claim: self,
            direction: Direction::Input,
        })
    }
}

impl<G: GpioController> Drop for PinClaim<G> {
    fn drop(&mut self) {
        self.gpio.release(self.pin);
    }
}

/// A configured GPIO line
///
/// Output lines are driven low before the pin is released.
pub struct GpioLine<G: GpioController> {
    claim: PinClaim<G>,
    direction: Direction,
}

impl<G: GpioController> GpioLine<G> {
    /// Pin number
    pub fn pin(&self) -> PinId {
        self.claim.pin
    }

    /// Direction fixed at configuration
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Drive the line (ignored for inputs)
    pub fn set(&self, high: bool) {
        if self.direction == Direction::Output {
            self.claim.gpio.set_value(self.claim.pin, high);
        }
    }

    /// Sample the line
    pub fn get(&self) -> bool {
        self.claim.gpio.get_value(self.claim.pin)
    }

    /// Interrupt line reporting this pin's edges
    pub fn resolve_irq(&self) -> Result<IrqNumber, IrqError> {
        self.claim.gpio.resolve_irq(self.claim.pin)
    }
}

impl<G: GpioController> Drop for GpioLine<G> {
    fn drop(&mut self) {
        if self.direction == Direction::Output {
            self.claim.gpio.set_value(self.claim.pin, false);
        }
        // claim drops next and releases the pin
    }
}

impl<G: GpioController> ErrorType for GpioLine<G> {
    type Error = Infallible;
}

impl<G: GpioController> OutputPin for GpioLine<G> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

impl<G: GpioController> StatefulOutputPin for GpioLine<G> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.get())
    }
}

impl<G: GpioController> InputPin for GpioLine<G> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::mock::Recorder;

    fn led() -> LineConfig {
        LineConfig::new(21, "led")
    }

    #[test]
    fn test_output_line_lifecycle() {
        let gpio = Recorder::default();
        let line = PinClaim::acquire(&gpio, &led())
            .and_then(|c| c.into_output(false))
            .unwrap();
        assert_eq!(line.direction(), Direction::Output);
        assert_eq!(line.pin(), 21);

        line.set(true);
        assert!(line.get());
        drop(line);

        // Forced low, then released
        assert!(!gpio.level(21));
        let calls = gpio.calls();
        assert_eq!(&calls[calls.len() - 2..], ["set_value", "release"]);
    }

    #[test]
    fn test_direction_failure_releases_pin() {
        let gpio = Recorder::failing("direction_output");
        let result = PinClaim::acquire(&gpio, &led()).and_then(|c| c.into_output(false));
        assert!(matches!(result, Err(InitError::PinConfig(21))));
        // Released without being driven
        assert_eq!(gpio.calls(), ["acquire", "direction_output", "release"]);
    }

    #[test]
    fn test_busy_pin_holds_nothing() {
        let gpio = Recorder::failing("acquire");
        let result = PinClaim::acquire(&gpio, &led());
        assert!(matches!(result, Err(InitError::PinBusy(21))));
        assert_eq!(gpio.calls(), ["acquire"]);
    }

    #[test]
    fn test_input_line_is_not_driven() {
        let gpio = Recorder::default();
        let line = PinClaim::acquire(&gpio, &LineConfig::new(14, "button"))
            .and_then(|c| c.into_input())
            .unwrap();
        line.set(true);
        drop(line);
        assert_eq!(gpio.calls(), ["acquire", "direction_input", "release"]);
    }

    #[test]
    fn test_embedded_hal_output() {
        let gpio = Recorder::default();
        let mut line = PinClaim::acquire(&gpio, &led())
            .and_then(|c| c.into_output(false))
            .unwrap();

        line.set_high().unwrap();
        assert!(line.is_set_high().unwrap());
        line.toggle().unwrap();
        assert!(line.is_set_low().unwrap());
        assert!(!gpio.level(21));
    }

    #[test]
    fn test_resolve_irq() {
        let gpio = Recorder::default();
        let line = PinClaim::acquire(&gpio, &LineConfig::new(14, "button"))
            .and_then(|c| c.into_input())
            .unwrap();
        assert_eq!(line.resolve_irq(), Ok(114));
    }
}
