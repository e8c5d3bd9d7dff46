//! Interface enumeration through getifaddrs

use std::net::Ipv4Addr;

use get_if_addrs::IfAddr;

use super::{InterfaceKind, NetworkInterface};
use crate::{Error, Result};

const TUNNEL_PREFIXES: &[&str] = &["utun", "tun", "tap", "wg", "ppp", "gif", "stf", "ipsec", "tailscale", "zt"];
const VIRTUAL_PREFIXES: &[&str] = &["docker", "veth", "virbr", "br", "vboxnet", "vmnet", "bridge", "awdl", "llw", "anpi", "cni", "flannel"];
const WIRELESS_PREFIXES: &[&str] = &["wl", "ath", "ra"];
const ETHERNET_PREFIXES: &[&str] = &["eth", "en", "em", "igb", "bge", "re"];

/// List interfaces that currently hold an address, grouped by name in
/// enumeration order
pub(super) fn list_interfaces() -> Result<Vec<NetworkInterface>> {
    let addrs = get_if_addrs::get_if_addrs()
        .map_err(|e| Error::Network(e.to_string()))?;

    let mut interfaces: Vec<NetworkInterface> = Vec::new();
    for entry in addrs {
        let ipv4: Option<Ipv4Addr> = match &entry.addr {
            IfAddr::V4(v4) => Some(v4.ip),
            IfAddr::V6(_) => None,
        };

        let index = match interfaces.iter().position(|i| i.name == entry.name) {
            Some(index) => index,
            None => {
                let kind = if entry.is_loopback() {
                    InterfaceKind::Loopback
                } else {
                    classify(&entry.name)
                };
                interfaces.push(NetworkInterface {
                    name: entry.name.clone(),
                    kind,
                    // getifaddrs only reports configured interfaces
                    is_up: true,
                    ipv4: Vec::new(),
                });
                interfaces.len() - 1
            }
        };

        if let Some(ip) = ipv4 {
            interfaces[index].ipv4.push(ip);
        }
    }

    Ok(interfaces)
}

fn classify(name: &str) -> InterfaceKind {
    #[cfg(target_os = "linux")]
    if let Some(kind) = classify_sysfs(name) {
        return kind;
    }
    classify_by_name(name)
}

/// sysfs knows whether an interface is backed by hardware
#[cfg(target_os = "linux")]
fn classify_sysfs(name: &str) -> Option<InterfaceKind> {
    let path = std::path::Path::new("/sys/class/net").join(name);
    if !path.exists() {
        return None;
    }

    let kind = if name == "lo" {
        InterfaceKind::Loopback
    } else if path.join("tun_flags").exists() {
        InterfaceKind::Tunnel
    } else if path.join("wireless").exists() || path.join("phy80211").exists() {
        InterfaceKind::Wireless
    } else if path.join("device").exists() {
        InterfaceKind::Ethernet
    } else {
        InterfaceKind::Virtual
    };
    Some(kind)
}

fn classify_by_name(name: &str) -> InterfaceKind {
    let has_prefix = |prefixes: &[&str]| prefixes.iter().any(|p| name.starts_with(p));

    if name == "lo" || name == "lo0" {
        InterfaceKind::Loopback
    } else if has_prefix(TUNNEL_PREFIXES) {
        InterfaceKind::Tunnel
    } else if has_prefix(VIRTUAL_PREFIXES) {
        InterfaceKind::Virtual
    } else if has_prefix(WIRELESS_PREFIXES) {
        InterfaceKind::Wireless
    } else if has_prefix(ETHERNET_PREFIXES) {
        InterfaceKind::Ethernet
    } else {
        InterfaceKind::Other
    }
}
