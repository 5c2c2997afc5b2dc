use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use pnet::datalink::{MacAddr, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use std::net::Ipv6Addr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const IFF_UP: u32 = 1;
pub const IFF_BROADCAST: u32 = 1 << 1;
pub const IFF_LOOPBACK: u32 = 1 << 3;

pub fn ni(name: &str, index: u32, mac: Option<MacAddr>, ips: &[IpNetwork], flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: "".into(),
        index,
        mac,
        ips: ips.to_vec(),
        flags,
    }
}

pub fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> anyhow::Result<IpNetwork> {
    Ok(IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p)?))
}

pub fn v6(s: &str, p: u8) -> anyhow::Result<IpNetwork> {
    Ok(IpNetwork::V6(Ipv6Network::new(s.parse::<Ipv6Addr>()?, p)?))
}

/// A TCP service on a loopback address that greets every client with `greeting`.
///
/// With `greeting` set to `None` the service accepts and stays silent. The accept loop
/// stops when the handle is dropped.
pub struct FakeService {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl FakeService {
    pub async fn bind(ip: Ipv4Addr, port: u16, greeting: Option<&'static [u8]>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind((ip, port)).await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    if let Some(bytes) = greeting {
                        let _ = stream.write_all(bytes).await;
                    }
                    tokio::time::sleep(Duration::from_secs(3)).await;
                });
            }
        });

        Ok(Self { addr, task })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.task.abort();
    }
}
