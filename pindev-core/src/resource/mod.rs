//! Scoped acquisition guards
//!
//! Every resource a driver takes during load is wrapped in a guard that
//! gives it back on drop. Loading composes the guards in acquisition
//! order; if a step fails, the guards already built drop in reverse and
//! nothing is left held. Drivers store the guards as struct fields in
//! teardown order, so dropping the driver releases everything in exactly
//! the reverse of acquisition.

pub mod chardev;
pub mod deadline;
pub mod irq;
pub mod line;

pub use chardev::CharDevice;
pub use deadline::ArmedDeadline;
pub use irq::IrqRegistration;
pub use line::{GpioLine, PinClaim};
