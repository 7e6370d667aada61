//! Simulated interrupt controller
//!
//! Each bound interrupt owns a slot whose handler mutex is held for the
//! duration of a call. That serialises handlers per line and lets
//! `unregister_handler` wait for one that is already running.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pindev_hal::{Edge, EdgeHandler, InterruptController, IrqError, IrqNumber};

use crate::{lock, Fault, SimBoard};

pub(crate) struct IrqSlot {
    edge: Edge,
    name: String,
    handler: Mutex<Option<Arc<dyn EdgeHandler>>>,
}

pub(crate) type IrqTable = HashMap<IrqNumber, Arc<IrqSlot>>;

impl SimBoard {
    pub(crate) fn raise_edge(&self, irq: IrqNumber, was_high: bool, now_high: bool) {
        let slot = lock(&self.shared.irqs).get(&irq).cloned();
        let Some(slot) = slot else {
            return;
        };
        if !slot.edge.matches(was_high, now_high) {
            return;
        }

        let handler = lock(&slot.handler);
        if let Some(handler) = handler.as_ref() {
            handler.handle(irq);
        }
    }

    /// Interrupts with a handler bound, ascending
    pub fn bound_irqs(&self) -> Vec<IrqNumber> {
        let mut bound: Vec<IrqNumber> = lock(&self.shared.irqs).keys().copied().collect();
        bound.sort_unstable();
        bound
    }

    /// Name a handler was registered under
    pub fn irq_name(&self, irq: IrqNumber) -> Option<String> {
        lock(&self.shared.irqs).get(&irq).map(|slot| slot.name.clone())
    }
}

impl InterruptController for SimBoard {
    fn register_edge_handler(
        &self,
        irq: IrqNumber,
        edge: Edge,
        name: &str,
        handler: Arc<dyn EdgeHandler>,
    ) -> Result<(), IrqError> {
        if self.faulted(Fault::IrqRequest(irq)) {
            return Err(IrqError::Busy);
        }

        let mut irqs = lock(&self.shared.irqs);
        if irqs.contains_key(&irq) {
            return Err(IrqError::Busy);
        }
        irqs.insert(
            irq,
            Arc::new(IrqSlot {
                edge,
                name: name.to_string(),
                handler: Mutex::new(Some(handler)),
            }),
        );
        Ok(())
    }

    fn unregister_handler(&self, irq: IrqNumber) {
        let slot = lock(&self.shared.irqs).remove(&irq);
        match slot {
            // Blocks until an in-flight handler returns
            Some(slot) => drop(lock(&slot.handler).take()),
            None => self.violation(format!("unregister of unbound irq {}", irq)),
        }
    }
}
