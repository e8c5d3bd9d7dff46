//! Interface enumeration through the IP Helper API

use std::net::Ipv4Addr;

use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, ERROR_SUCCESS};
use windows::Win32::NetworkManagement::IpHelper::{
    GetAdaptersAddresses, GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER,
    GAA_FLAG_SKIP_MULTICAST, IF_TYPE_ETHERNET_CSMACD, IF_TYPE_IEEE80211,
    IF_TYPE_SOFTWARE_LOOPBACK, IF_TYPE_TUNNEL, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::NetworkManagement::Ndis::IfOperStatusUp;
use windows::Win32::Networking::WinSock::{AF_INET, SOCKADDR_IN};

use super::{InterfaceKind, NetworkInterface};
use crate::{Error, Result};

/// ifType reported by gigabit adapters
const IF_TYPE_GIGABITETHERNET: u32 = 117;

const MAX_ATTEMPTS: usize = 3;

pub(super) fn list_interfaces() -> Result<Vec<NetworkInterface>> {
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let mut size: u32 = 16 * 1024;

    for _ in 0..MAX_ATTEMPTS {
        // u64 storage keeps the adapter list suitably aligned
        let mut buffer = vec![0u64; (size as usize).div_ceil(8)];
        let head = buffer.as_mut_ptr() as *mut IP_ADAPTER_ADDRESSES_LH;

        let status = unsafe {
            GetAdaptersAddresses(AF_INET.0 as u32, flags, None, Some(head), &mut size)
        };

        if status == ERROR_BUFFER_OVERFLOW.0 {
            continue;
        }
        if status != ERROR_SUCCESS.0 {
            return Err(Error::Network(format!(
                "GetAdaptersAddresses failed with status {}",
                status
            )));
        }

        return Ok(unsafe { collect_adapters(head) });
    }

    Err(Error::Network("adapter list kept growing while being read".to_string()))
}

/// Walk the adapter linked list.
///
/// # Safety
/// `head` must point at a list filled in by `GetAdaptersAddresses` whose
/// backing buffer outlives this call.
unsafe fn collect_adapters(head: *const IP_ADAPTER_ADDRESSES_LH) -> Vec<NetworkInterface> {
    let mut interfaces = Vec::new();
    let mut adapter = head;

    while let Some(current) = adapter.as_ref() {
        let name = current
            .FriendlyName
            .to_string()
            .unwrap_or_else(|_| String::from("<unnamed>"));

        let mut ipv4 = Vec::new();
        let mut unicast = current.FirstUnicastAddress;
        while let Some(entry) = unicast.as_ref() {
            let sockaddr = entry.Address.lpSockaddr;
            if !sockaddr.is_null() && (*sockaddr).sa_family == AF_INET {
                let sin = &*(sockaddr as *const SOCKADDR_IN);
                ipv4.push(Ipv4Addr::from(u32::from_be(sin.sin_addr.S_un.S_addr)));
            }
            unicast = entry.Next;
        }

        interfaces.push(NetworkInterface {
            name,
            kind: kind_from_if_type(current.IfType),
            is_up: current.OperStatus == IfOperStatusUp,
            ipv4,
        });

        adapter = current.Next;
    }

    interfaces
}

fn kind_from_if_type(if_type: u32) -> InterfaceKind {
    match if_type {
        IF_TYPE_ETHERNET_CSMACD | IF_TYPE_GIGABITETHERNET => InterfaceKind::Ethernet,
        IF_TYPE_IEEE80211 => InterfaceKind::Wireless,
        IF_TYPE_SOFTWARE_LOOPBACK => InterfaceKind::Loopback,
        IF_TYPE_TUNNEL => InterfaceKind::Tunnel,
        _ => InterfaceKind::Other,
    }
}
