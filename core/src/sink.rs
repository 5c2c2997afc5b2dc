use std::net::Ipv4Addr;

/// Receives scan events as they happen, before the final result is assembled.
///
/// Calls come from the collector one at a time, in arrival order.
pub trait HostSink: Send + Sync {
    /// A responsive host was found.
    fn host_found(&self, addr: Ipv4Addr);

    /// `done` of `total` candidates have an outcome.
    fn probe_finished(&self, _done: usize, _total: usize) {}
}

impl<F> HostSink for F
where
    F: Fn(Ipv4Addr) + Send + Sync,
{
    fn host_found(&self, addr: Ipv4Addr) {
        self(addr)
    }
}
