use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Local};
use colored::*;
use sshsweep_common::config::Config;
use sshsweep_common::network::interface::local_prefixes;
use sshsweep_common::network::prefix::{HOSTS_PER_PREFIX, SubnetPrefix};
use sshsweep_common::{error, info, success, warn};
use sshsweep_core::{ScanResult, ScanSettings, Scanner, StopSignal};
use tracing::Instrument;

use crate::mprint;
use crate::report::{LiveReport, ResultFile};
use crate::terminal::{colors, menu, print, progress};

/// Exit status shells report for SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

pub async fn scan(
    prefix: Option<SubnetPrefix>,
    settings: ScanSettings,
    started: DateTime<Local>,
    cfg: &Config,
) -> anyhow::Result<()> {
    let prefix = match prefix {
        Some(prefix) => prefix,
        None => ask_for_prefix().await?,
    };

    let file = match cfg.no_file {
        true => None,
        false => Some(ResultFile::create(&cfg.output_dir, prefix, &started)?),
    };

    print::header(&format!("scanning {}", prefix.cidr()), cfg.quiet);
    if cfg.quiet == 0 {
        print::print_status(format!(
            "{} probes at a time on port {}",
            settings.concurrency, settings.probe.port
        ));
    }

    let stop = StopSignal::new();
    let interrupts = tokio::spawn(handle_interrupts(stop.clone()));

    let span = progress::scan_span(prefix, HOSTS_PER_PREFIX)?;
    let sink = LiveReport::new(file.as_ref(), span.clone());
    let result = Scanner::new(settings)?
        .with_stop_signal(stop.clone())
        .scan(prefix, &sink)
        .instrument(span)
        .await;
    drop(sink);
    // From here on Ctrl-C ends the program.
    stop.stop();

    let saved = match file {
        Some(file) => Some(file.finish(result.responsive.len(), &Local::now())?),
        None => None,
    };

    scan_ends(&result, saved.as_deref(), cfg);

    if cfg.interactive {
        tokio::task::spawn_blocking(|| menu::wait_for_enter(&mut io::stdin().lock(), &mut io::stdout()))
            .await
            .context("prompt task failed")??;
    }
    interrupts.abort();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    StopScan,
    Exit,
}

/// The first Ctrl-C of a running scan stops it. Any other ends the program.
fn on_interrupt(stop: &StopSignal) -> Interrupt {
    if stop.is_stopped() {
        return Interrupt::Exit;
    }
    stop.stop();
    Interrupt::StopScan
}

/// Owns SIGINT for the rest of the scan command.
///
/// Listening replaces the default handler for the whole process, so this keeps listening
/// and exits with 130 itself once the scan no longer needs the signal.
async fn handle_interrupts(stop: StopSignal) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Could not listen for Ctrl-C: {e}");
            return;
        }
        match on_interrupt(&stop) {
            Interrupt::StopScan => {
                info!("Stopping, waiting for probes in flight (Ctrl-C again to quit)...")
            }
            Interrupt::Exit => std::process::exit(INTERRUPTED_EXIT_CODE),
        }
    }
}

/// Runs the network menu on a blocking thread.
async fn ask_for_prefix() -> anyhow::Result<SubnetPrefix> {
    let suggestions = local_prefixes();
    let prefix = tokio::task::spawn_blocking(move || {
        menu::choose_prefix(&mut io::stdin().lock(), &mut io::stdout(), &suggestions)
    })
    .await
    .context("menu task failed")??;
    Ok(prefix)
}

fn scan_ends(result: &ScanResult, saved: Option<&Path>, cfg: &Config) {
    if cfg.quiet == 2 {
        for host in result.hosts() {
            print::print(&host.to_string());
        }
        return;
    }

    if result.responsive.is_empty() {
        print::header("no ssh servers found", cfg.quiet);
        print::no_results();
    } else {
        if cfg.quiet > 0 {
            mprint!();
        }
        print::header("ssh servers", cfg.quiet);
        for (idx, host) in result.hosts().enumerate() {
            print::host_line(idx + 1, &host.to_string());
        }
    }

    print_summary(result, cfg);

    if let Some(path) = saved {
        print::print_status(format!("Results saved to {}", path.display()));
    }
    if result.stopped {
        warn!(
            "Scan stopped early: {} of {HOSTS_PER_PREFIX} hosts were probed",
            result.probed
        );
    }
    if cfg.quiet == 0 {
        print::end_of_program();
    }
}

fn print_summary(result: &ScanResult, cfg: &Config) {
    let found: ColoredString = format!("{} SSH servers", result.responsive.len()).bold().green();
    let took: ColoredString = format_elapsed(result.elapsed).bold().yellow();
    let output: ColoredString =
        format!("Scan Complete: {found} found in {took}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            mprint!();
            success!("{}", output);
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
