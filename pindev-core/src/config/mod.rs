//! Configuration types
//!
//! Board defaults for both drivers. There is no configuration file; a
//! platform builds these in code (or deserializes them with `serde`).

pub mod types;

pub use types::*;
