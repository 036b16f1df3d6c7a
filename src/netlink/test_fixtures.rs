//! Shared builders for netlink test messages.

use super::attr::encode_attribute;
use super::{AddressRecord, IFA_ADDRESS, RTM_DELADDR, RTM_NEWADDR, RawMessage};

/// `AF_INET` as carried in the record's family byte.
pub const FAMILY_V4: u8 = 2;

/// `AF_INET6` as carried in the record's family byte.
pub const FAMILY_V6: u8 = 10;

/// Builds an address record for the given family and interface.
pub const fn record(family: u8, index: u32) -> AddressRecord {
    AddressRecord {
        family,
        prefix_len: if family == FAMILY_V4 { 24 } else { 64 },
        flags: 0,
        scope: 0,
        index,
    }
}

/// Builds an address payload from a record and `(type, value)` attributes.
pub fn payload(record: AddressRecord, attributes: &[(u16, &[u8])]) -> Vec<u8> {
    let mut out = record.to_bytes().to_vec();
    for (kind, value) in attributes {
        encode_attribute(&mut out, *kind, value);
    }
    out
}

fn family_of(address: &[u8]) -> u8 {
    if address.len() == 16 { FAMILY_V6 } else { FAMILY_V4 }
}

/// A "new address" message carrying a single address attribute.
pub fn new_address(index: u32, address: &[u8]) -> RawMessage {
    let record = record(family_of(address), index);
    RawMessage::new(RTM_NEWADDR, payload(record, &[(IFA_ADDRESS, address)]))
}

/// A "delete address" message carrying a single address attribute.
pub fn del_address(index: u32, address: &[u8]) -> RawMessage {
    let record = record(family_of(address), index);
    RawMessage::new(RTM_DELADDR, payload(record, &[(IFA_ADDRESS, address)]))
}
