//! Shared driver state
//!
//! State touched from more than one execution context (user calls,
//! interrupt handler, deadline callback) lives here, behind
//! critical-section mutexes so every access is atomic with respect to
//! interrupts and other CPUs.

pub mod toggle;
pub mod write_buffer;

pub use toggle::ToggleState;
pub use write_buffer::WriteBuffer;
