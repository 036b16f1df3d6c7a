//! Address change event types.

use std::fmt;
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

/// The kind of address change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// An address was added to an interface.
    Added,
    /// An address was removed from an interface.
    Removed,
}

impl ChangeKind {
    /// Short tag used in text output: `new` or `del`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Added => "new",
            Self::Removed => "del",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An interface address change reported by the kernel.
///
/// The address is kept as the raw attribute bytes: 4 bytes for IPv4, 16 for
/// IPv6, or empty when the message carried no address attribute. An empty
/// address is a data-quality signal, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressEvent {
    address: Vec<u8>,
    kind: ChangeKind,
    interface_index: u32,
}

impl AddressEvent {
    /// Creates a new address event.
    #[must_use]
    pub fn new(address: impl Into<Vec<u8>>, kind: ChangeKind, interface_index: u32) -> Self {
        Self {
            address: address.into(),
            kind,
            interface_index,
        }
    }

    /// Creates an "added" event.
    #[must_use]
    pub fn added(address: impl Into<Vec<u8>>, interface_index: u32) -> Self {
        Self::new(address, ChangeKind::Added, interface_index)
    }

    /// Creates a "removed" event.
    #[must_use]
    pub fn removed(address: impl Into<Vec<u8>>, interface_index: u32) -> Self {
        Self::new(address, ChangeKind::Removed, interface_index)
    }

    /// Raw address bytes as carried by the kernel.
    #[must_use]
    pub fn address_bytes(&self) -> &[u8] {
        &self.address
    }

    /// Whether the address was added or removed.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Index of the interface the address belongs to.
    #[must_use]
    pub const fn interface_index(&self) -> u32 {
        self.interface_index
    }

    /// Returns true if this is an "added" event.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self.kind, ChangeKind::Added)
    }

    /// Returns true if this is a "removed" event.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self.kind, ChangeKind::Removed)
    }

    /// Returns true if the message carried an address attribute.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// Interprets the address bytes as an IP address.
    ///
    /// Returns `None` unless the address is exactly 4 or 16 bytes long.
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        if let Ok(octets) = <[u8; 4]>::try_from(self.address.as_slice()) {
            return Some(IpAddr::V4(Ipv4Addr::from(octets)));
        }
        if let Ok(octets) = <[u8; 16]>::try_from(self.address.as_slice()) {
            return Some(IpAddr::V6(Ipv6Addr::from(octets)));
        }
        None
    }

    /// Renders the address for display.
    ///
    /// IP addresses use their usual notation, an absent address renders as
    /// `<nil>`, and any other length as `?` followed by lowercase hex.
    #[must_use]
    pub fn address_string(&self) -> String {
        if let Some(ip) = self.ip() {
            return ip.to_string();
        }
        if self.address.is_empty() {
            return "<nil>".to_string();
        }
        self.address
            .iter()
            .fold(String::from("?"), |mut out, byte| {
                let _ = write!(out, "{byte:02x}");
                out
            })
    }
}

impl fmt::Display for AddressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.kind,
            self.interface_index,
            self.address_string()
        )
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
