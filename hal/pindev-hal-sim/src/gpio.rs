//! Simulated GPIO lines
//!
//! Tracks which lines are owned, their direction and level. Inputs are
//! driven from the outside with [`SimBoard::drive_input`], which also
//! raises the line's interrupt on a matching edge.

use std::collections::HashMap;

use pindev_hal::{Direction, GpioController, GpioError, IrqError, IrqNumber, PinId};

use crate::{lock, Fault, SimBoard};

/// Number of lines on the simulated controller
pub const SIM_GPIO_COUNT: PinId = 1024;

/// Interrupt number of line 0; line `n` maps to `IRQ_BASE + n`
pub const IRQ_BASE: IrqNumber = 4096;

#[derive(Debug, Clone, Default)]
pub(crate) struct PinState {
    /// Label of the current owner
    owner: Option<String>,
    direction: Option<Direction>,
    level: bool,
}

pub(crate) type PinTable = HashMap<PinId, PinState>;

impl SimBoard {
    /// Drive an input line from the outside
    ///
    /// Raises the line's interrupt when the level change matches the
    /// registered edge. The handler runs on the calling thread.
    pub fn drive_input(&self, pin: PinId, high: bool) {
        let was_high = {
            let mut pins = lock(&self.shared.pins);
            let state = pins.entry(pin).or_default();
            if state.direction == Some(Direction::Output) {
                self.violation(format!("drive_input on output line {}", pin));
                return;
            }
            core::mem::replace(&mut state.level, high)
        };

        self.raise_edge(IRQ_BASE + pin, was_high, high);
    }

    /// Press and release a button wired to `pin` (one rising edge)
    pub fn press_button(&self, pin: PinId) {
        self.drive_input(pin, true);
        self.drive_input(pin, false);
    }

    /// Current level of a line
    pub fn level(&self, pin: PinId) -> bool {
        lock(&self.shared.pins).get(&pin).is_some_and(|s| s.level)
    }

    /// Label of the owner of a line
    pub fn owner(&self, pin: PinId) -> Option<String> {
        lock(&self.shared.pins).get(&pin).and_then(|s| s.owner.clone())
    }

    /// Direction a line was last configured in
    pub fn direction(&self, pin: PinId) -> Option<Direction> {
        lock(&self.shared.pins).get(&pin).and_then(|s| s.direction)
    }

    /// Lines currently owned, ascending
    pub fn held_pins(&self) -> Vec<PinId> {
        let mut held: Vec<PinId> = lock(&self.shared.pins)
            .iter()
            .filter(|(_, s)| s.owner.is_some())
            .map(|(pin, _)| *pin)
            .collect();
        held.sort_unstable();
        held
    }

    fn configure(&self, pin: PinId, direction: Direction, level: Option<bool>) -> Result<(), GpioError> {
        if self.faulted(Fault::Direction(pin)) {
            return Err(GpioError::ConfigFailed);
        }

        let mut pins = lock(&self.shared.pins);
        let state = pins.get_mut(&pin).filter(|s| s.owner.is_some());
        let Some(state) = state else {
            return Err(GpioError::ConfigFailed);
        };
        state.direction = Some(direction);
        if let Some(level) = level {
            state.level = level;
        }
        Ok(())
    }
}

impl GpioController for SimBoard {
    fn acquire(&self, pin: PinId, label: &str) -> Result<(), GpioError> {
        if pin >= SIM_GPIO_COUNT {
            return Err(GpioError::InvalidPin);
        }
        if self.faulted(Fault::Acquire(pin)) {
            return Err(GpioError::Busy);
        }

        let mut pins = lock(&self.shared.pins);
        let state = pins.entry(pin).or_default();
        if state.owner.is_some() {
            return Err(GpioError::Busy);
        }
        state.owner = Some(label.to_string());
        Ok(())
    }

    fn direction_input(&self, pin: PinId) -> Result<(), GpioError> {
        self.configure(pin, Direction::Input, None)
    }

    fn direction_output(&self, pin: PinId, initial: bool) -> Result<(), GpioError> {
        self.configure(pin, Direction::Output, Some(initial))
    }

    fn set_value(&self, pin: PinId, high: bool) {
        let mut pins = lock(&self.shared.pins);
        // Writes to released or input lines have no effect
        if let Some(state) = pins.get_mut(&pin) {
            if state.owner.is_some() && state.direction == Some(Direction::Output) {
                state.level = high;
            }
        }
    }

    fn get_value(&self, pin: PinId) -> bool {
        self.level(pin)
    }

    fn release(&self, pin: PinId) {
        let released = {
            let mut pins = lock(&self.shared.pins);
            match pins.get_mut(&pin) {
                Some(state) if state.owner.is_some() => {
                    state.owner = None;
                    state.direction = None;
                    true
                }
                _ => false,
            }
        };
        if !released {
            self.violation(format!("release of unowned line {}", pin));
        }
    }

    fn resolve_irq(&self, pin: PinId) -> Result<IrqNumber, IrqError> {
        if pin >= SIM_GPIO_COUNT || self.faulted(Fault::IrqMapping(pin)) {
            return Err(IrqError::NoMapping);
        }
        Ok(IRQ_BASE + pin)
    }
}
