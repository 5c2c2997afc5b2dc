mod commands;
mod report;
mod terminal;

use chrono::Local;
use commands::{CommandLine, Commands, prefixes, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = commands.config();

    match commands.command() {
        Commands::Prefixes => {
            prefixes::prefixes(&cfg);
            Ok(())
        }
        Commands::Scan { prefix } => {
            let started = Local::now();
            print::banner(cfg.no_banner, cfg.quiet, &started);
            scan::scan(prefix, commands.scan_settings(), started, &cfg).await
        }
    }
}
