use pnet::datalink::MacAddr;
use sshsweep_common::network::interface::prefixes_from_interfaces;
use sshsweep_common::network::prefix::SubnetPrefix;

use crate::support::{IFF_BROADCAST, IFF_LOOPBACK, IFF_UP, ni, v4, v6};

#[test]
fn suggestions_follow_wired_then_system_order() -> anyhow::Result<()> {
    let mac = Some(MacAddr(0, 1, 2, 3, 4, 5));
    let interfaces = vec![
        ni("lo", 1, None, &[v4(127, 0, 0, 1, 8)?], IFF_UP | IFF_LOOPBACK),
        ni("wlp2s0", 2, mac, &[v4(192, 168, 178, 23, 24)?, v6("fe80::1", 64)?], IFF_UP | IFF_BROADCAST),
        ni("docker0", 3, mac, &[v4(172, 17, 0, 1, 16)?], IFF_BROADCAST),
        ni("enp0s31f6", 4, mac, &[v4(10, 20, 30, 40, 24)?, v4(10, 20, 30, 41, 24)?], IFF_UP | IFF_BROADCAST),
        ni("tun0", 5, None, &[v4(10, 8, 0, 6, 24)?], IFF_UP),
    ];

    let suggestions = prefixes_from_interfaces(interfaces, |i| i.name.starts_with("en"));
    let found: Vec<(SubnetPrefix, &str)> = suggestions
        .iter()
        .map(|s| (s.prefix, s.interface.as_str()))
        .collect();

    assert_eq!(
        found,
        vec![
            (SubnetPrefix::new(10, 20, 30), "enp0s31f6"),
            (SubnetPrefix::new(192, 168, 178), "wlp2s0"),
            (SubnetPrefix::new(10, 8, 0), "tun0"),
        ]
    );
    Ok(())
}

#[test]
fn loopback_address_on_a_regular_interface_is_ignored() -> anyhow::Result<()> {
    let interfaces = vec![ni("eth0", 1, None, &[v4(127, 0, 1, 1, 8)?], IFF_UP | IFF_BROADCAST)];

    assert!(prefixes_from_interfaces(interfaces, |_| true).is_empty());
    Ok(())
}
