//! Routing netlink protocol layer.
//!
//! This module provides:
//! - Message framing over a raw receive buffer ([`parse_messages`], [`RawMessage`])
//! - Attribute walking ([`AttributeIter`])
//! - Address message decoding ([`decode`], [`AddressRecord`])
//! - Multicast group selection ([`IpVersion`])
//! - The transport seam ([`Transport`], [`Connect`]) and its Linux socket
//!   implementation ([`NetlinkSocket`], [`NetlinkConnector`])
//!
//! All multi-byte header fields are read in host byte order, which is how the
//! kernel writes them. Decoding bytes captured on a host of different
//! endianness is not supported.

mod addr;
mod attr;
mod error;
mod frame;
mod group;
#[cfg(target_os = "linux")]
mod socket;
mod transport;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use addr::{AddressRecord, decode};
pub use attr::AttributeIter;
pub use error::{DecodeError, ParseError, TransportError};
pub use frame::{MessageHeader, RawMessage, parse_messages};
pub use group::IpVersion;
#[cfg(target_os = "linux")]
pub use socket::{NetlinkConnector, NetlinkSocket};
pub use transport::{Connect, Transport};

/// Alignment of netlink messages and attributes.
pub const ALIGN_TO: usize = 4;

/// Size of the netlink message header (`struct nlmsghdr`).
pub const NLMSG_HDRLEN: usize = 16;

/// Size of the address message header (`struct ifaddrmsg`).
pub const IFADDRMSG_LEN: usize = 8;

/// Size of a routing attribute header (`struct rtattr`).
pub const RTA_HDRLEN: usize = 4;

/// Default receive buffer size, large enough for address change datagrams.
pub const DEFAULT_BUFFER_SIZE: usize = 2048;

/// Message type of a "new address" notification.
pub const RTM_NEWADDR: u16 = 20;

/// Message type of a "delete address" notification.
pub const RTM_DELADDR: u16 = 21;

/// Attribute type carrying the interface address.
pub const IFA_ADDRESS: u16 = 1;

/// Attribute type carrying the local address (point-to-point links).
pub const IFA_LOCAL: u16 = 2;

/// Multicast group number for IPv4 address changes.
pub const RTNLGRP_IPV4_IFADDR: u32 = 5;

/// Multicast group number for IPv6 address changes.
pub const RTNLGRP_IPV6_IFADDR: u32 = 9;

/// Rounds `len` up to the next [`ALIGN_TO`] boundary.
#[inline]
#[must_use]
pub const fn align(len: usize) -> usize {
    (len + ALIGN_TO - 1) & !(ALIGN_TO - 1)
}
