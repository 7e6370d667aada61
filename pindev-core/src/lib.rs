//! Board-agnostic building blocks for the pindev drivers
//!
//! This crate contains everything the drivers share that does not depend
//! on a specific platform:
//!
//! - Logging macros (defmt when enabled, silent otherwise)
//! - Configuration type definitions
//! - Init error taxonomy
//! - Shared driver state (toggle flag, echo buffer)
//! - Short-transfer arithmetic for device reads and writes
//! - Scoped acquisition guards that release in reverse order on drop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(feature = "defmt")]
#[doc(hidden)]
pub use defmt;

#[macro_use]
mod logging;

pub mod config;
pub mod error;
pub mod resource;
pub mod state;
pub mod transfer;

pub use error::{InitError, Stage};
