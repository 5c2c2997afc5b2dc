//! # sshsweep common
//!
//! Types shared by the scanner core and the command line front-end.
//!
//! * **[`network`]**: the validated [`network::prefix::SubnetPrefix`] model and the advisory
//!   local prefix discovery.
//! * **[`config`]**: presentation settings handed from the CLI to the reporting code.
//! * Status macros (`info!`, `success!`, `warn!`, `error!`) routed through `tracing`.

pub mod config;
pub mod macros;
pub mod network;

#[doc(hidden)]
pub use tracing;
