//! Interrupt registration
//!
//! Handlers are capabilities: the platform holds an `Arc` to the handler
//! and invokes it from interrupt context whenever the configured edge is
//! seen on the line.

use alloc::sync::Arc;

/// Interrupt line number
pub type IrqNumber = u32;

/// Edge that triggers the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
    /// Either transition
    Both,
}

impl Edge {
    /// Check if a transition from `was_high` to `now_high` matches this edge
    pub fn matches(self, was_high: bool, now_high: bool) -> bool {
        match self {
            Edge::Rising => !was_high && now_high,
            Edge::Falling => was_high && !now_high,
            Edge::Both => was_high != now_high,
        }
    }
}

/// Handler verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// The interrupt was ours and has been serviced
    Handled,
    /// Not ours
    None,
}

/// Errors from resolving or binding an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqError {
    /// Pin has no interrupt line
    NoMapping,
    /// Line already has a handler
    Busy,
    /// Requested trigger is not supported
    Unsupported,
}

/// Edge interrupt handler
///
/// Runs in interrupt context: must not allocate or block. The platform
/// guarantees the same handler is never re-entered for one line.
pub trait EdgeHandler: Send + Sync {
    /// Service one edge
    fn handle(&self, irq: IrqNumber) -> IrqReturn;
}

/// Interrupt controller
pub trait InterruptController {
    /// Bind `handler` to `irq` for the given edge
    fn register_edge_handler(
        &self,
        irq: IrqNumber,
        edge: Edge,
        name: &str,
        handler: Arc<dyn EdgeHandler>,
    ) -> Result<(), IrqError>;

    /// Unbind the handler on `irq`
    ///
    /// Must not return while the handler is still running on another CPU.
    fn unregister_handler(&self, irq: IrqNumber);
}
