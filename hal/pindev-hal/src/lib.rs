//! Pindev Hardware Abstraction Layer
//!
//! This crate defines the traits a platform must implement to host the
//! pindev drivers. The drivers only ever talk to hardware, the interrupt
//! controller, the timer wheel and the device-file registry through these
//! traits, so the same driver code runs on a real kernel binding or on the
//! host simulator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pindev-drivers (toggle, auto-off)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pindev-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ pindev-hal-   │       │ kernel / board│
//! │     sim       │       │   binding     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioController`] - Pin acquisition and digital I/O
//! - [`irq::InterruptController`] - Edge handler registration
//! - [`timer::DeadlineTimer`] - One-shot deadline
//! - [`chrdev::DeviceRegistry`] - Device number, class, device file, char device
//! - [`chrdev::DeviceChannel`] - Byte-stream file operations
//! - [`uaccess::UserWriter`], [`uaccess::UserReader`] - User-space copies

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod chrdev;
pub mod gpio;
pub mod irq;
pub mod timer;
pub mod uaccess;

// Re-export key traits at crate root for convenience
pub use chrdev::{AllocationFailure, ClassId, DeviceChannel, DeviceNumber, DeviceRegistry};
pub use gpio::{Direction, GpioController, GpioError, PinId};
pub use irq::{Edge, EdgeHandler, InterruptController, IrqError, IrqNumber, IrqReturn};
pub use timer::{DeadlineCallback, DeadlineTimer};
pub use uaccess::{SliceReader, SliceWriter, UserReader, UserWriter};
