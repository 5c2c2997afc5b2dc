//! Local interface inspection.
//!
//! Proposes `/24` prefixes to scan based on the IPv4 addresses configured on this machine.
//! The suggestions are advisory only: a scan accepts any valid prefix.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
#[cfg(target_os = "macos")]
use macos_impl::{is_physical, is_wireless};
#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};

use crate::network::prefix::SubnetPrefix;

/// A prefix proposed from a local interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSuggestion {
    pub prefix: SubnetPrefix,
    /// Name of the first interface the prefix was seen on.
    pub interface: String,
}

/// Prefixes of every usable local IPv4 address, wired interfaces first.
pub fn local_prefixes() -> Vec<PrefixSuggestion> {
    let suggestions = prefixes_from_interfaces(datalink::interfaces(), is_wired);
    tracing::debug!(count = suggestions.len(), "collected local prefix suggestions");
    suggestions
}

/// Extracts one suggestion per distinct `/24` from `interfaces`.
///
/// Down and loopback interfaces are skipped, as are loopback addresses. Interfaces for
/// which `is_wired` holds are listed first; otherwise the system order is kept.
pub fn prefixes_from_interfaces(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Vec<PrefixSuggestion> {
    let mut interfaces: Vec<NetworkInterface> = interfaces
        .into_iter()
        .filter(|i| i.is_up() && !i.is_loopback() && !i.ips.is_empty())
        .collect();

    interfaces.sort_by_key(|i| if is_wired(i) { 0 } else { 1 });

    let mut suggestions: Vec<PrefixSuggestion> = Vec::new();
    for interface in &interfaces {
        for net in &interface.ips {
            let IpNetwork::V4(v4) = net else {
                continue;
            };
            if v4.ip().is_loopback() {
                continue;
            }

            let prefix = SubnetPrefix::from(v4.ip());
            if suggestions.iter().any(|s| s.prefix == prefix) {
                continue;
            }
            suggestions.push(PrefixSuggestion {
                prefix,
                interface: interface.name.clone(),
            });
        }
    }
    suggestions
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn is_wired(interface: &NetworkInterface) -> bool {
    interface.name.starts_with('e')
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(target_os = "macos")]
mod macos_impl {
    use super::*;
    use std::collections::HashSet;
    use std::process::Command;
    use std::sync::OnceLock;

    struct HardwareInfo {
        physical_devices: HashSet<String>,
        wireless_devices: HashSet<String>,
    }

    /// Runs `networksetup` once and caches what it reports.
    fn get_hardware_info() -> &'static HardwareInfo {
        static HARDWARE_INFO: OnceLock<HardwareInfo> = OnceLock::new();

        HARDWARE_INFO.get_or_init(|| {
            let mut physical = HashSet::new();
            let mut wireless = HashSet::new();

            if let Ok(output) = Command::new("networksetup").arg("-listallhardwareports").output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                for line in stdout.lines() {
                    if let Some(device) = line.strip_prefix("Device: ") {
                        physical.insert(device.trim().to_string());
                    }
                }
            }

            for device in &physical {
                let is_wifi = Command::new("networksetup")
                    .arg("-getairportnetwork")
                    .arg(device)
                    .output()
                    .map(|out| out.status.success())
                    .unwrap_or(false);

                if is_wifi {
                    wireless.insert(device.clone());
                }
            }

            HardwareInfo {
                physical_devices: physical,
                wireless_devices: wireless,
            }
        })
    }

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        get_hardware_info().physical_devices.contains(&interface.name)
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        get_hardware_info().wireless_devices.contains(&interface.name)
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

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::ipnetwork::{Ipv4Network, Ipv6Network};
    use pnet::util::MacAddr;
    use std::net::{Ipv4Addr, Ipv6Addr};

    const IFF_UP: u32 = 1;
    const IFF_BROADCAST: u32 = 1 << 1;
    const IFF_LOOPBACK: u32 = 1 << 3;

    fn create_mock_interface(name: &str, ips: Vec<IpNetwork>, flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "An interface".to_string(),
            index: 0,
            mac: Some(MacAddr(0x1, 0x2, 0x3, 0x4, 0x5, 0x6)),
            ips,
            flags,
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, p: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), p).unwrap())
    }

    fn v6(s: &str, p: u8) -> IpNetwork {
        IpNetwork::V6(Ipv6Network::new(s.parse::<Ipv6Addr>().unwrap(), p).unwrap())
    }

    fn never_wired(_: &NetworkInterface) -> bool {
        false
    }

    #[test]
    fn prefixes_should_come_from_ipv4_addresses() {
        let interfaces = vec![create_mock_interface(
            "eth0",
            vec![v4(192, 168, 1, 42, 24), v6("fe80::1", 64)],
            IFF_UP | IFF_BROADCAST,
        )];

        let suggestions = prefixes_from_interfaces(interfaces, never_wired);

        assert_eq!(
            suggestions,
            vec![PrefixSuggestion {
                prefix: SubnetPrefix::new(192, 168, 1),
                interface: "eth0".to_string(),
            }]
        );
    }

    #[test]
    fn prefixes_should_skip_down_and_loopback_interfaces() {
        let interfaces = vec![
            create_mock_interface("lo", vec![v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK),
            create_mock_interface("eth1", vec![v4(10, 1, 2, 3, 24)], IFF_BROADCAST),
            create_mock_interface("wlan0", vec![v4(172, 16, 0, 9, 16)], IFF_UP),
        ];

        let suggestions = prefixes_from_interfaces(interfaces, never_wired);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].prefix, SubnetPrefix::new(172, 16, 0));
    }

    #[test]
    fn prefixes_should_be_deduplicated() {
        let interfaces = vec![
            create_mock_interface("eth0", vec![v4(192, 168, 1, 2, 24)], IFF_UP),
            create_mock_interface("eth1", vec![v4(192, 168, 1, 3, 24)], IFF_UP),
            create_mock_interface("eth2", vec![v4(192, 168, 2, 3, 24)], IFF_UP),
        ];

        let suggestions = prefixes_from_interfaces(interfaces, never_wired);
        let prefixes: Vec<String> = suggestions.iter().map(|s| s.prefix.to_string()).collect();

        assert_eq!(prefixes, vec!["192.168.1", "192.168.2"]);
        assert_eq!(suggestions[0].interface, "eth0");
    }

    #[test]
    fn prefixes_should_list_wired_interfaces_first() {
        let interfaces = vec![
            create_mock_interface("wlan0", vec![v4(192, 168, 50, 2, 24)], IFF_UP),
            create_mock_interface("enp3s0", vec![v4(10, 0, 0, 2, 24)], IFF_UP),
        ];
        let is_wired = |i: &NetworkInterface| i.name.starts_with("en");

        let suggestions = prefixes_from_interfaces(interfaces, is_wired);

        assert_eq!(suggestions[0].prefix, SubnetPrefix::new(10, 0, 0));
        assert_eq!(suggestions[1].prefix, SubnetPrefix::new(192, 168, 50));
    }

    #[test]
    fn prefixes_should_be_empty_without_ipv4() {
        let interfaces = vec![create_mock_interface(
            "eth0",
            vec![v6("2001:db8::1", 64)],
            IFF_UP | IFF_BROADCAST,
        )];

        assert!(prefixes_from_interfaces(interfaces, never_wired).is_empty());
    }
}
