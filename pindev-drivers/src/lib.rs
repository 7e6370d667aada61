//! GPIO character-device drivers
//!
//! This crate provides the two drivers built on the traits in pindev-hal
//! and the guards in pindev-core:
//!
//! - [`toggle::InterruptToggleDriver`]: a button edge flips an LED; the
//!   device file reports the LED and accepts `'0'`/`'1'`
//! - [`auto_off::TimerAutoOffDriver`]: the LED comes on at load and a
//!   one-shot deadline turns it off; the device file echoes the last write
//!
//! Both drivers are plain values owned by whoever loaded them. Dropping a
//! driver tears it down in the reverse order of its load.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod auto_off;
pub mod toggle;

pub use auto_off::{EchoChannel, LedCutoff, TimerAutoOffDriver};
pub use toggle::{InterruptToggleDriver, ToggleChannel};
