//! Counting admission gate.
//!
//! Caps how many probes may hold a socket at once. Occupancy is tracked next to the
//! semaphore so the cap can be observed from the outside.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug)]
struct GateState {
    permits: Arc<Semaphore>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Cloneable handle to one gate. Clones share the same slots.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    state: Arc<GateState>,
}

/// One occupied slot. Dropping it frees the slot, on every path including unwinding.
#[derive(Debug)]
pub struct GateSlot {
    state: Arc<GateState>,
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(GateState {
                permits: Arc::new(Semaphore::new(capacity)),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Waits for a free slot. There is no timeout: a slot opens when another holder drops.
    pub async fn enter(&self) -> Result<GateSlot, AcquireError> {
        let permit = Arc::clone(&self.state.permits).acquire_owned().await?;
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak.fetch_max(now, Ordering::SeqCst);

        Ok(GateSlot {
            state: Arc::clone(&self.state),
            _permit: permit,
        })
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of slots held at the same time so far.
    pub fn peak(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    fn available(&self) -> usize {
        self.state.permits.available_permits()
    }
}

impl Drop for GateSlot {
    fn drop(&mut self) {
        // Runs before the permit field is dropped, so in_flight never exceeds capacity.
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
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
