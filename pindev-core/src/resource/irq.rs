//! Edge interrupt binding

use alloc::sync::Arc;

use pindev_hal::{Edge, EdgeHandler, GpioController, InterruptController, IrqNumber};

use super::line::GpioLine;
use crate::error::InitError;

/// An edge handler bound to a line's interrupt
///
/// Dropping it unbinds the handler; the controller waits for a running
/// handler to finish before that returns.
pub struct IrqRegistration<I: InterruptController> {
    ctrl: I,
    irq: IrqNumber,
}

impl<I: InterruptController + Clone> IrqRegistration<I> {
    /// Resolve `line`'s interrupt and bind `handler` to `edge`
    pub fn request<G: GpioController>(
        ctrl: &I,
        line: &GpioLine<G>,
        edge: Edge,
        name: &str,
        handler: Arc<dyn EdgeHandler>,
    ) -> Result<Self, InitError> {
        let irq = line.resolve_irq().map_err(|e| {
            log_error!("cannot request irq for gpio {} ({:?})", line.pin(), e);
            InitError::InterruptBinding(e)
        })?;

        ctrl.register_edge_handler(irq, edge, name, handler)
            .map_err(|e| {
                log_error!("cannot use irq {} for gpio {} ({:?})", irq, line.pin(), e);
                InitError::InterruptBinding(e)
            })?;
        log_debug!("irq {} bound to gpio {}", irq, line.pin());

        Ok(Self {
            ctrl: ctrl.clone(),
            irq,
        })
    }
}

impl<I: InterruptController> IrqRegistration<I> {
    /// Bound interrupt number
    pub fn irq(&self) -> IrqNumber {
        self.irq
    }
}

impl<I: InterruptController> Drop for IrqRegistration<I> {
    fn drop(&mut self) {
        self.ctrl.unregister_handler(self.irq);
    }
}
