//! Network interface address collector.
//!
//! Enumerates interfaces with getifaddrs(3) and groups their link-layer,
//! IPv4 and IPv6 addresses. Link state is taken from the interface flags for
//! interfaces that also appear in /proc/net/dev, and reported as "unknown"
//! otherwise.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use nix::ifaddrs::{getifaddrs, InterfaceAddress};
use nix::net::if_::InterfaceFlags;
use nix::sys::socket::SockaddrStorage;
use serde::Serialize;
use std::net::{Ipv6Addr, SocketAddrV4, SocketAddrV6};

use herakles_dashboard_api::SourceError;

use crate::collectors::netdev::read_netdev_stats;

const NO_MAC: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStatus {
    Up,
    Down,
    Unknown,
}

impl InterfaceStatus {
    /// Interfaces without kernel counters have no reliable link state.
    pub fn from_flags(flags: InterfaceFlags, has_stats: bool) -> Self {
        if !has_stats {
            InterfaceStatus::Unknown
        } else if flags.contains(InterfaceFlags::IFF_UP | InterfaceFlags::IFF_RUNNING) {
            InterfaceStatus::Up
        } else {
            InterfaceStatus::Down
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddressInfo {
    pub family: AddressFamily,
    pub address: String,
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterface {
    pub name: String,
    pub status: InterfaceStatus,
    pub mac_address: String,
    pub ip_addresses: Vec<IpAddressInfo>,
}

impl NetworkInterface {
    fn new(name: String, status: InterfaceStatus) -> Self {
        Self {
            name,
            status,
            mac_address: NO_MAC.to_string(),
            ip_addresses: Vec::new(),
        }
    }
}

/// Formats a hardware address as lowercase colon-separated hex.
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn ipv4(addr: Option<&SockaddrStorage>) -> Option<String> {
    addr.and_then(|a| a.as_sockaddr_in())
        .map(|sin| SocketAddrV4::from(*sin).ip().to_string())
}

fn ipv6(addr: Option<&SockaddrStorage>) -> Option<Ipv6Addr> {
    addr.and_then(|a| a.as_sockaddr_in6())
        .map(|sin6| *SocketAddrV6::from(*sin6).ip())
}

/// Renders an IPv6 address, adding the `%ifname` zone for link-local (fe80::/10).
pub fn format_ipv6(ip: &Ipv6Addr, interface: &str) -> String {
    if ip.segments()[0] & 0xffc0 == 0xfe80 {
        format!("{ip}%{interface}")
    } else {
        ip.to_string()
    }
}

fn apply_address(iface: &mut NetworkInterface, entry: &InterfaceAddress) {
    let Some(address) = entry.address.as_ref() else {
        return;
    };

    if let Some(link) = address.as_link_addr() {
        if let Some(mac) = link.addr() {
            iface.mac_address = format_mac(&mac);
        }
    } else if let Some(ip) = ipv4(Some(address)) {
        iface.ip_addresses.push(IpAddressInfo {
            family: AddressFamily::IPv4,
            address: ip,
            netmask: ipv4(entry.netmask.as_ref()),
            broadcast: ipv4(entry.broadcast.as_ref()),
        });
    } else if let Some(ip) = ipv6(Some(address)) {
        iface.ip_addresses.push(IpAddressInfo {
            family: AddressFamily::IPv6,
            address: format_ipv6(&ip, &iface.name),
            netmask: ipv6(entry.netmask.as_ref()).map(|mask| mask.to_string()),
            broadcast: None,
        });
    }
}

/// Groups getifaddrs entries per interface, keeping first-seen order.
pub fn group_interfaces<I>(entries: I, with_stats: &HashSet<String>) -> Vec<NetworkInterface>
where
    I: IntoIterator<Item = InterfaceAddress>,
{
    let mut interfaces: Vec<NetworkInterface> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let slot = match index.get(&entry.interface_name) {
            Some(&i) => i,
            None => {
                let status = InterfaceStatus::from_flags(
                    entry.flags,
                    with_stats.contains(&entry.interface_name),
                );
                interfaces.push(NetworkInterface::new(entry.interface_name.clone(), status));
                index.insert(entry.interface_name.clone(), interfaces.len() - 1);
                interfaces.len() - 1
            }
        };
        apply_address(&mut interfaces[slot], &entry);
    }

    interfaces
}

/// Lists all network interfaces with their addresses and link state.
pub fn read_interfaces() -> Result<Vec<NetworkInterface>, SourceError> {
    let with_stats: HashSet<String> = read_netdev_stats()?.into_keys().collect();
    let entries = getifaddrs().map_err(|e| SourceError::Unavailable(format!("getifaddrs: {e}")))?;
    Ok(group_interfaces(entries, &with_stats))
}
