//! End-to-end sweeps against real sockets.
//!
//! Linux routes all of `127.0.0.0/8` to loopback, so listeners bound to `127.0.0.5` and
//! `127.0.0.9` behave like two separate hosts in the `127.0.0` prefix. Every other
//! candidate refuses the connection.
#![cfg(target_os = "linux")]

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use sshsweep_common::network::prefix::SubnetPrefix;
use sshsweep_core::{ProbeSettings, ScanSettings, Scanner, StopSignal};

use crate::support::FakeService;

const SSH_HOST: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 5);
const OTHER_HOST: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 9);
const LOOPBACK_PREFIX: SubnetPrefix = SubnetPrefix::new(127, 0, 0);

fn settings(port: u16) -> ScanSettings {
    ScanSettings {
        probe: ProbeSettings {
            port,
            connect_timeout: Duration::from_millis(500),
            read_timeout: Duration::from_millis(500),
            ..ProbeSettings::default()
        },
        ..ScanSettings::default()
    }
}

async fn scan(port: u16) -> anyhow::Result<(sshsweep_core::ScanResult, Vec<Ipv4Addr>)> {
    let reported = Mutex::new(Vec::new());
    let sink = |addr: Ipv4Addr| {
        if let Ok(mut seen) = reported.lock() {
            seen.push(addr);
        }
    };

    let result = Scanner::new(settings(port))?.scan(LOOPBACK_PREFIX, &sink).await;
    let reported = reported.into_inner().map_err(|_| anyhow::anyhow!("poisoned"))?;
    Ok((result, reported))
}

#[tokio::test]
async fn sweep_finds_only_the_ssh_host() -> anyhow::Result<()> {
    let ssh = FakeService::bind(SSH_HOST, 0, Some(b"SSH-2.0-x\r\n")).await?;
    let _web = FakeService::bind(OTHER_HOST, ssh.port(), Some(b"HTTP/1.1 400 Bad Request\r\n")).await?;

    let (result, reported) = scan(ssh.port()).await?;

    assert_eq!(result.responsive, BTreeSet::from([SSH_HOST]));
    assert_eq!(reported, vec![SSH_HOST]);
    assert_eq!(result.probed, 254);
    assert!(result.is_complete());
    assert!(!result.stopped);
    assert!(result.peak_in_flight <= 100);
    Ok(())
}

#[tokio::test]
async fn sweep_ignores_closed_and_silent_hosts() -> anyhow::Result<()> {
    let ssh = FakeService::bind(SSH_HOST, 0, Some(b"SSH-2.0-x\r\n")).await?;
    let _silent = FakeService::bind(OTHER_HOST, ssh.port(), None).await?;

    let (result, _) = scan(ssh.port()).await?;

    assert_eq!(result.hosts().copied().collect::<Vec<_>>(), vec![SSH_HOST]);
    assert_eq!(result.probed, 254);
    Ok(())
}

#[tokio::test]
async fn sweep_is_repeatable() -> anyhow::Result<()> {
    let ssh = FakeService::bind(SSH_HOST, 0, Some(b"SSH-2.0-x\r\n")).await?;

    let (first, _) = scan(ssh.port()).await?;
    let (second, _) = scan(ssh.port()).await?;

    assert_eq!(first.responsive, second.responsive);
    assert_eq!(first.probed, second.probed);
    Ok(())
}

#[tokio::test]
async fn sweep_with_nothing_listening_finishes_empty() -> anyhow::Result<()> {
    let port = {
        let probe = FakeService::bind(SSH_HOST, 0, None).await?;
        probe.port()
    };

    let (result, reported) = scan(port).await?;

    assert!(result.responsive.is_empty());
    assert!(reported.is_empty());
    assert_eq!(result.probed, 254);
    Ok(())
}

#[tokio::test]
async fn sweep_stopped_up_front_probes_nothing() -> anyhow::Result<()> {
    let ssh = FakeService::bind(SSH_HOST, 0, Some(b"SSH-2.0-x\r\n")).await?;
    let stop = StopSignal::new();
    stop.stop();

    let result = Scanner::new(settings(ssh.port()))?
        .with_stop_signal(stop)
        .scan(LOOPBACK_PREFIX, &|_: Ipv4Addr| {})
        .await;

    assert!(result.stopped);
    assert_eq!(result.probed, 0);
    assert!(result.responsive.is_empty());
    Ok(())
}
