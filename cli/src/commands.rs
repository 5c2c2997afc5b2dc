pub mod prefixes;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sshsweep_common::config::Config;
use sshsweep_common::network::prefix::SubnetPrefix;
use sshsweep_core::scanner::DEFAULT_CONCURRENCY;
use sshsweep_core::{ProbeSettings, ScanSettings};

#[derive(Parser)]
#[command(name = "sshsweep", version)]
#[command(about = "Find SSH servers in an IPv4 /24 network.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Maximum number of probes with an open connection at once
    #[arg(short, long, global = true, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Connect deadline per host, in milliseconds
    #[arg(long, global = true, default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: u64,

    /// Banner read deadline per host, in milliseconds
    #[arg(long, global = true, default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_timeout: u64,

    /// Directory the result file is written to
    #[arg(short, long, global = true, default_value = ".")]
    pub output: PathBuf,

    /// Do not write a result file
    #[arg(long, global = true)]
    pub no_file: bool,

    /// Hide the start-up banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Reduce output (-q drops decorations, -qq prints results only)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Scan a /24 network, e.g. `192.168.1`; asks interactively when omitted
    #[command(alias = "s")]
    Scan { prefix: Option<SubnetPrefix> },
    /// List the networks suggested by local interfaces
    #[command(alias = "p")]
    Prefixes,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run. No subcommand means an interactive scan.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Scan { prefix: None })
    }

    pub fn config(&self) -> Config {
        Config {
            no_banner: self.no_banner,
            quiet: self.quiet,
            no_file: self.no_file,
            output_dir: self.output.clone(),
            interactive: matches!(self.command(), Commands::Scan { prefix: None }),
        }
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            concurrency: self.concurrency,
            probe: ProbeSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout),
                read_timeout: Duration::from_millis(self.read_timeout),
                ..ProbeSettings::default()
            },
        }
    }
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|e| format!("invalid number '{s}': {e}"))?;
    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(value)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
