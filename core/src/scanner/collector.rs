//! Drains probe outcomes from concurrent workers.

use std::collections::{BTreeSet, HashSet};
use std::net::Ipv4Addr;

use tokio::sync::mpsc;
use tracing::warn;

use crate::network::prober::ProbeOutcome;
use crate::sink::HostSink;

/// What the collector saw once every producer was gone.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub responsive: BTreeSet<Ipv4Addr>,
    pub probed: usize,
}

pub(crate) struct Collector<'a, S: HostSink + ?Sized> {
    sink: &'a S,
    total: usize,
    seen: HashSet<Ipv4Addr>,
    responsive: BTreeSet<Ipv4Addr>,
}

impl<'a, S: HostSink + ?Sized> Collector<'a, S> {
    pub fn new(sink: &'a S, total: usize) -> Self {
        Self {
            sink,
            total,
            seen: HashSet::with_capacity(total),
            responsive: BTreeSet::new(),
        }
    }

    /// Consumes outcomes until every sender has been dropped.
    ///
    /// Finishing depends only on the channel closing, never on how many hosts answered.
    pub async fn drain(mut self, mut rx: mpsc::Receiver<ProbeOutcome>) -> Collected {
        while let Some(outcome) = rx.recv().await {
            self.record(outcome);
        }

        Collected {
            probed: self.seen.len(),
            responsive: self.responsive,
        }
    }

    fn record(&mut self, outcome: ProbeOutcome) {
        let addr = outcome.addr();
        if !self.seen.insert(addr) {
            warn!(%addr, "ignoring second outcome for the same candidate");
            return;
        }

        if outcome.is_responsive() {
            self.responsive.insert(addr);
            self.sink.host_found(addr);
        }
        self.sink.probe_finished(self.seen.len(), self.total);
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
