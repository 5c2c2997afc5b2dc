//! Single-host SSH probe.
//!
//! Connects to the SSH port, reads whatever the server sends first and checks it for
//! `SSH`. Every failure collapses into [`ProbeOutcome::Unresponsive`]: a closed port, a
//! silent service and a non-SSH banner all look the same to the caller.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

pub const SSH_PORT: u16 = 22;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_BANNER_LEN: usize = 1024;

const SSH_MARKER: &[u8] = b"SSH";

/// Result of probing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The host answered with an SSH banner.
    Responsive(Ipv4Addr),
    /// Anything else: refused, unreachable, timed out, silent or not SSH.
    Unresponsive(Ipv4Addr),
}

impl ProbeOutcome {
    pub fn addr(&self) -> Ipv4Addr {
        match self {
            Self::Responsive(addr) | Self::Unresponsive(addr) => *addr,
        }
    }

    pub fn is_responsive(&self) -> bool {
        matches!(self, Self::Responsive(_))
    }
}

/// Classifies one address. Implementations must not retry.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub port: u16,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Upper bound on the bytes read from the banner.
    pub banner_len: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            port: SSH_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            banner_len: DEFAULT_BANNER_LEN,
        }
    }
}

/// Why a probe came back unresponsive. Only ever logged.
#[derive(Debug, Error)]
enum ProbeError {
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),
    #[error("no banner within {0:?}")]
    ReadTimeout(Duration),
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),
    #[error("connection closed before any banner was sent")]
    Closed,
}

/// TCP connect + banner read prober.
#[derive(Debug, Clone, Default)]
pub struct BannerProber {
    settings: ProbeSettings,
}

impl BannerProber {
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }

    /// Returns the first chunk the server sends, at most `banner_len` bytes.
    ///
    /// The stream is owned by this call and closed on every return path.
    async fn grab_banner(&self, addr: Ipv4Addr) -> Result<Vec<u8>, ProbeError> {
        let socket_addr = SocketAddr::V4(SocketAddrV4::new(addr, self.settings.port));
        let connect_timeout = self.settings.connect_timeout;
        let read_timeout = self.settings.read_timeout;

        let mut stream = timeout(connect_timeout, TcpStream::connect(socket_addr))
            .await
            .map_err(|_| ProbeError::ConnectTimeout(connect_timeout))?
            .map_err(ProbeError::Connect)?;

        let mut buf = vec![0u8; self.settings.banner_len];
        let read = timeout(read_timeout, stream.read(&mut buf))
            .await
            .map_err(|_| ProbeError::ReadTimeout(read_timeout))?
            .map_err(ProbeError::Read)?;

        if read == 0 {
            return Err(ProbeError::Closed);
        }
        buf.truncate(read);
        Ok(buf)
    }
}

#[async_trait]
impl Prober for BannerProber {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        match self.grab_banner(addr).await {
            Ok(banner) if is_ssh_banner(&banner) => {
                let text = String::from_utf8_lossy(&banner);
                trace!(%addr, banner = text.trim_end(), "ssh banner");
                ProbeOutcome::Responsive(addr)
            }
            Ok(banner) => {
                trace!(%addr, len = banner.len(), "banner is not ssh");
                ProbeOutcome::Unresponsive(addr)
            }
            Err(e) => {
                trace!(%addr, error = %e, "probe failed");
                ProbeOutcome::Unresponsive(addr)
            }
        }
    }
}

fn is_ssh_banner(banner: &[u8]) -> bool {
    banner.windows(SSH_MARKER.len()).any(|w| w == SSH_MARKER)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
