//! Multicast group selection.

use std::fmt;

use super::{RTNLGRP_IPV4_IFADDR, RTNLGRP_IPV6_IFADDR};

/// Bitmask subscribing to IPv4 address changes.
const GROUP_IPV4_IFADDR: u32 = 1 << (RTNLGRP_IPV4_IFADDR - 1);

/// Bitmask subscribing to IPv6 address changes.
const GROUP_IPV6_IFADDR: u32 = 1 << (RTNLGRP_IPV6_IFADDR - 1);

/// IP version whose address changes a socket subscribes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IpVersion {
    /// IPv4 address changes only.
    V4,
    /// IPv6 address changes only.
    V6,
    /// Both IPv4 and IPv6 address changes.
    #[default]
    Both,
}

impl IpVersion {
    /// Returns true if this version includes IPv4.
    #[must_use]
    pub const fn includes_v4(self) -> bool {
        matches!(self, Self::V4 | Self::Both)
    }

    /// Returns true if this version includes IPv6.
    #[must_use]
    pub const fn includes_v6(self) -> bool {
        matches!(self, Self::V6 | Self::Both)
    }

    /// Returns the multicast group bitmask to bind the socket with.
    #[must_use]
    pub const fn multicast_groups(self) -> u32 {
        let mut groups = 0;
        if self.includes_v4() {
            groups |= GROUP_IPV4_IFADDR;
        }
        if self.includes_v6() {
            groups |= GROUP_IPV6_IFADDR;
        }
        groups
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
            Self::Both => write!(f, "Both"),
        }
    }
}
