//! # sshsweep core
//!
//! Finds SSH servers in an IPv4 `/24` by connecting to port 22 on each host and looking
//! for an SSH banner.
//!
//! * **[`network::prober`]**: one connection attempt, classified as responsive or not.
//! * **[`scanner`]**: dispatches one probe per candidate behind a bounded admission gate
//!   and collects the outcomes into a [`scanner::ScanResult`].
//! * **[`sink`]**: where responsive hosts are reported the moment they are found.
//! * **[`stop`]**: optional early stop for a running scan.

pub mod network;
pub mod scanner;
pub mod sink;
pub mod stop;

pub use network::prober::{BannerProber, ProbeOutcome, ProbeSettings, Prober};
pub use scanner::{ScanError, ScanResult, ScanSettings, Scanner};
pub use sink::HostSink;
pub use stop::StopSignal;
