//! Local network interface enumeration and LAN address ranking

#[cfg(not(windows))]
mod unix;
#[cfg(windows)]
mod win32;

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::{Error, Result};

/// Hardware class of a network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Ethernet,
    Wireless,
    Loopback,
    Tunnel,
    Virtual,
    Other,
}

impl InterfaceKind {
    /// Only physical LAN interfaces are worth advertising to a peer
    pub fn is_lan(self) -> bool {
        matches!(self, InterfaceKind::Ethernet | InterfaceKind::Wireless)
    }
}

/// An enumerated interface with its IPv4 unicast addresses
#[derive(Debug, Clone)]
pub struct NetworkInterface {
    pub name: String,
    pub kind: InterfaceKind,
    pub is_up: bool,
    pub ipv4: Vec<Ipv4Addr>,
}

/// An eligible address together with its locality priority (lower wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkCandidate {
    pub address: Ipv4Addr,
    pub priority: u8,
    pub interface: String,
}

/// Source of the host's network interfaces
pub trait InterfaceSource {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>>;
}

/// Reads interfaces from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
        #[cfg(windows)]
        {
            win32::list_interfaces()
        }
        #[cfg(not(windows))]
        {
            unix::list_interfaces()
        }
    }
}

/// Locality priority of an address.
///
/// Home and office LAN ranges come first; the VirtualBox host-only range and
/// anything public-looking come last.
pub fn address_priority(address: Ipv4Addr) -> u8 {
    match address.octets() {
        [192, 168, 0 | 1, _] => 0,
        [192, 168, 56, _] => 255,
        [192, 168, _, _] => 1,
        [172, 16, _, _] => 1,
        [10, _, _, _] => 2,
        _ => 255,
    }
}

/// Rank every eligible address, best first.
///
/// The sort is stable, so equal priorities keep enumeration order.
pub fn rank_candidates(interfaces: &[NetworkInterface]) -> Vec<NetworkCandidate> {
    let mut candidates: Vec<NetworkCandidate> = interfaces
        .iter()
        .filter(|iface| iface.is_up && iface.kind.is_lan())
        .flat_map(|iface| {
            iface
                .ipv4
                .iter()
                .filter(|addr| !addr.is_loopback() && !addr.is_unspecified())
                .map(|addr| NetworkCandidate {
                    address: *addr,
                    priority: address_priority(*addr),
                    interface: iface.name.clone(),
                })
        })
        .collect();

    candidates.sort_by_key(|c| c.priority);
    candidates
}

/// Pick the address a peer on the operator's LAN is most likely to reach
pub fn select_preferred_address(source: &impl InterfaceSource) -> Result<String> {
    let interfaces = source.interfaces()?;
    let candidates = rank_candidates(&interfaces);

    for candidate in &candidates {
        tracing::debug!(
            "address candidate {} on {} (priority {})",
            candidate.address,
            candidate.interface,
            candidate.priority
        );
    }

    candidates
        .into_iter()
        .next()
        .map(|c| c.address.to_string())
        .ok_or(Error::NoAddressFound)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed interface list for tests
    #[derive(Clone, Default)]
    pub(crate) struct StaticInterfaces(pub Vec<NetworkInterface>);

    impl InterfaceSource for StaticInterfaces {
        fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
            Ok(self.0.clone())
        }
    }

    pub(crate) fn iface(name: &str, kind: InterfaceKind, addrs: &[&str]) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            kind,
            is_up: true,
            ipv4: addrs.iter().map(|a| a.parse().unwrap()).collect(),
        }
    }

    #[test]
    fn test_priority_table() {
        let p = |s: &str| address_priority(s.parse().unwrap());
        assert_eq!(p("192.168.0.12"), 0);
        assert_eq!(p("192.168.1.50"), 0);
        assert_eq!(p("192.168.56.1"), 255);
        assert_eq!(p("192.168.178.20"), 1);
        assert_eq!(p("172.16.4.2"), 1);
        assert_eq!(p("172.17.0.1"), 255);
        assert_eq!(p("10.0.0.9"), 2);
        assert_eq!(p("203.0.113.5"), 255);
    }

    #[test]
    fn test_home_lan_beats_private_range() {
        let source = StaticInterfaces(vec![
            iface("Wi-Fi", InterfaceKind::Wireless, &["10.0.0.9"]),
            iface("Ethernet", InterfaceKind::Ethernet, &["192.168.1.50"]),
        ]);
        assert_eq!(select_preferred_address(&source).unwrap(), "192.168.1.50");
    }

    #[test]
    fn test_equal_priority_is_deterministic() {
        let source = StaticInterfaces(vec![
            iface("VirtualBox Host-Only", InterfaceKind::Ethernet, &["192.168.56.1"]),
            iface("Ethernet", InterfaceKind::Ethernet, &["203.0.113.5"]),
        ]);
        let first = select_preferred_address(&source).unwrap();
        assert_eq!(first, "192.168.56.1");
        for _ in 0..5 {
            assert_eq!(select_preferred_address(&source).unwrap(), first);
        }
    }

    #[test]
    fn test_excluded_interfaces_and_addresses() {
        let mut down = iface("eth1", InterfaceKind::Ethernet, &["192.168.0.7"]);
        down.is_up = false;

        let source = StaticInterfaces(vec![
            iface("lo", InterfaceKind::Loopback, &["127.0.0.1"]),
            iface("docker0", InterfaceKind::Virtual, &["192.168.1.1"]),
            iface("tun0", InterfaceKind::Tunnel, &["10.8.0.2"]),
            iface("eth0", InterfaceKind::Ethernet, &["127.0.0.1"]),
            down,
        ]);

        assert!(rank_candidates(&source.0).is_empty());
        assert!(matches!(
            select_preferred_address(&source),
            Err(Error::NoAddressFound)
        ));
    }

    #[test]
    fn test_no_interfaces_at_all() {
        let source = StaticInterfaces::default();
        assert!(matches!(
            select_preferred_address(&source),
            Err(Error::NoAddressFound)
        ));
    }

    #[test]
    fn test_rank_orders_best_first() {
        let interfaces = vec![
            iface("eth0", InterfaceKind::Ethernet, &["203.0.113.5", "10.1.2.3"]),
            iface("wlan0", InterfaceKind::Wireless, &["172.16.0.4", "192.168.0.10"]),
        ];
        let ranked: Vec<String> = rank_candidates(&interfaces)
            .iter()
            .map(|c| c.address.to_string())
            .collect();
        assert_eq!(ranked, ["192.168.0.10", "172.16.0.4", "10.1.2.3", "203.0.113.5"]);
    }

    #[test]
    fn test_system_interfaces_enumerate() {
        // Contents depend on the host; the OS call itself must succeed
        let interfaces = SystemInterfaces.interfaces().unwrap();
        let ranked = rank_candidates(&interfaces);
        assert!(ranked.iter().all(|c| interfaces.iter().any(|i| i.name == c.interface)));
    }
}
