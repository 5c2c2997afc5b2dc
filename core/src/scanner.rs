//! The bounded-concurrency sweep over one `/24`.
//!
//! Every candidate gets its own task, spawned up front. Tasks then queue on a shared
//! [`gate::AdmissionGate`], so at most `concurrency` probes have a socket open while the
//! rest wait. Outcomes travel over a channel sized for the whole prefix to a single
//! collector, which reports hosts to the [`HostSink`] as they arrive.
//!
//! The channel closes when the last task drops its sender, which is the only completion
//! signal the collector relies on.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sshsweep_common::network::prefix::{HOSTS_PER_PREFIX, SubnetPrefix};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, trace};

use crate::network::prober::{BannerProber, ProbeOutcome, ProbeSettings, Prober};
use crate::sink::HostSink;
use crate::stop::StopSignal;

pub mod gate;
mod collector;

use collector::Collector;
use gate::AdmissionGate;

pub const DEFAULT_CONCURRENCY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Maximum number of probes holding a socket at once.
    pub concurrency: usize,
    pub probe: ProbeSettings,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            probe: ProbeSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Frozen outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub prefix: SubnetPrefix,
    /// Hosts that answered with an SSH banner, ascending.
    pub responsive: BTreeSet<Ipv4Addr>,
    /// Candidates with an outcome. Equals [`HOSTS_PER_PREFIX`] unless the scan was stopped.
    pub probed: usize,
    /// Highest number of probes that held a gate slot at the same time.
    pub peak_in_flight: usize,
    /// Set when a [`StopSignal`] cut the scan short.
    pub stopped: bool,
    pub elapsed: Duration,
}

impl ScanResult {
    pub fn hosts(&self) -> impl Iterator<Item = &Ipv4Addr> {
        self.responsive.iter()
    }

    pub fn is_complete(&self) -> bool {
        self.probed == HOSTS_PER_PREFIX
    }
}

/// Runs exactly one scan.
///
/// [`Scanner::scan`] consumes the scanner and builds a fresh gate each time, so two scans
/// never share admission state.
pub struct Scanner<P: Prober = BannerProber> {
    prober: Arc<P>,
    concurrency: usize,
    stop: StopSignal,
}

impl Scanner<BannerProber> {
    pub fn new(settings: ScanSettings) -> Result<Self, ScanError> {
        Self::with_prober(BannerProber::new(settings.probe), settings.concurrency)
    }
}

impl<P: Prober> Scanner<P> {
    pub fn with_prober(prober: P, concurrency: usize) -> Result<Self, ScanError> {
        if concurrency == 0 {
            return Err(ScanError::ZeroConcurrency);
        }

        Ok(Self {
            prober: Arc::new(prober),
            concurrency,
            stop: StopSignal::new(),
        })
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Probes `.1` through `.254` of `prefix` and waits until every probe has finished.
    ///
    /// Responsive hosts are handed to `sink` as soon as they are seen. Individual probe
    /// failures never abort the scan.
    pub async fn scan<S>(self, prefix: SubnetPrefix, sink: &S) -> ScanResult
    where
        S: HostSink + ?Sized,
    {
        let start = Instant::now();
        let gate = AdmissionGate::new(self.concurrency);
        let (tx, rx) = mpsc::channel::<ProbeOutcome>(HOSTS_PER_PREFIX);

        let mut workers: JoinSet<()> = JoinSet::new();
        for candidate in prefix.candidates() {
            workers.spawn(probe_candidate(
                candidate,
                gate.clone(),
                Arc::clone(&self.prober),
                self.stop.clone(),
                tx.clone(),
            ));
        }
        drop(tx);

        debug!(
            %prefix,
            candidates = HOSTS_PER_PREFIX,
            concurrency = self.concurrency,
            "dispatched probes"
        );

        let collected = Collector::new(sink, HOSTS_PER_PREFIX).drain(rx).await;

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "probe worker did not finish cleanly");
            }
        }

        let result = ScanResult {
            prefix,
            responsive: collected.responsive,
            probed: collected.probed,
            peak_in_flight: gate.peak(),
            stopped: collected.probed < HOSTS_PER_PREFIX && self.stop.is_stopped(),
            elapsed: start.elapsed(),
        };

        debug!(
            %prefix,
            found = result.responsive.len(),
            probed = result.probed,
            peak_in_flight = result.peak_in_flight,
            "scan finished"
        );
        result
    }
}

/// One unit of work: wait for a slot, probe, report.
///
/// The slot is released when `_slot` drops, whichever way this function exits.
async fn probe_candidate<P: Prober>(
    addr: Ipv4Addr,
    gate: AdmissionGate,
    prober: Arc<P>,
    stop: StopSignal,
    tx: mpsc::Sender<ProbeOutcome>,
) {
    let outcome = tokio::select! {
        biased;
        _ = stop.stopped() => {
            trace!(%addr, "stopped before an outcome");
            return;
        }
        outcome = async {
            let Ok(_slot) = gate.enter().await else {
                return ProbeOutcome::Unresponsive(addr);
            };
            prober.probe(addr).await
        } => outcome,
    };

    if tx.send(outcome).await.is_err() {
        trace!(%addr, "collector gone, dropping outcome");
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
