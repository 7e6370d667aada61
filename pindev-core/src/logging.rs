//! Logging macros
//!
//! With the `defmt` feature these forward to the defmt macros of the same
//! level. Without it the arguments are still type-checked (so format
//! strings stay valid for both builds) but nothing is emitted.
//!
//! Only `{}` and `{:?}` placeholders are portable between the two builds.
//! defmt's expansion names `defmt::` unqualified, so the defmt variants
//! bring pindev-core's re-export into scope first. Calling crates need no
//! `defmt` dependency of their own.

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use $crate::defmt;
        defmt::error!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use $crate::defmt;
        defmt::warn!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use $crate::defmt;
        defmt::info!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        use $crate::defmt;
        defmt::debug!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        let _ = ::core::format_args!($($arg)*);
    }};
}
