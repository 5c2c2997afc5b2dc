//! Status macros.
//!
//! Thin wrappers over `tracing` so every crate reports status lines the same way.
//! The CLI formatter picks the line symbol from the level and the target.

/// Target used for raw lines that should be printed without a status symbol.
pub const PRINT_TARGET: &str = "sshsweep::print";

/// Target used for positive results (a host was found, a scan finished).
pub const SUCCESS_TARGET: &str = "sshsweep::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "sshsweep::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
