//! Address message decoding.

use crate::event::{AddressEvent, ChangeKind};

use super::{
    AttributeIter, DecodeError, IFA_ADDRESS, IFADDRMSG_LEN, ParseError, RTM_DELADDR, RTM_NEWADDR,
    RawMessage,
};

/// Fixed header of an address message (mirrors `struct ifaddrmsg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRecord {
    /// Address family (`AF_INET` or `AF_INET6`).
    pub family: u8,
    /// Prefix length of the address.
    pub prefix_len: u8,
    /// Address flags.
    pub flags: u8,
    /// Address scope.
    pub scope: u8,
    /// Interface index, in host byte order.
    pub index: u32,
}

impl AddressRecord {
    /// Parses the record from the front of an address message payload.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if fewer than [`IFADDRMSG_LEN`] bytes are available.
    pub fn parse(payload: &[u8]) -> Result<Self, ParseError> {
        let Some(bytes) = payload.get(..IFADDRMSG_LEN) else {
            return Err(ParseError::new("address record", IFADDRMSG_LEN, payload.len()));
        };

        Ok(Self {
            family: bytes[0],
            prefix_len: bytes[1],
            flags: bytes[2],
            scope: bytes[3],
            index: u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Serializes the record in host byte order.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; IFADDRMSG_LEN] {
        let index = self.index.to_ne_bytes();
        [
            self.family,
            self.prefix_len,
            self.flags,
            self.scope,
            index[0],
            index[1],
            index[2],
            index[3],
        ]
    }
}

/// Decodes one address message into an [`AddressEvent`].
///
/// When the address attribute occurs more than once, the last one wins.
/// A message without one decodes to an event with an empty address.
///
/// # Errors
///
/// - [`DecodeError::UnexpectedMessageType`] if the message is neither
///   `RTM_NEWADDR` nor `RTM_DELADDR`. Checked first, so foreign payloads
///   are never walked.
/// - [`DecodeError::Malformed`] if the record or any attribute is truncated.
pub fn decode(message: &RawMessage) -> Result<AddressEvent, DecodeError> {
    let kind = match message.kind() {
        RTM_NEWADDR => ChangeKind::Added,
        RTM_DELADDR => ChangeKind::Removed,
        other => return Err(DecodeError::UnexpectedMessageType(other)),
    };

    let record = AddressRecord::parse(&message.payload)?;

    let mut address: &[u8] = &[];
    for attribute in AttributeIter::new(&message.payload[IFADDRMSG_LEN..]) {
        let (attr_type, value) = attribute?;
        if attr_type == IFA_ADDRESS {
            address = value;
        }
    }

    Ok(AddressEvent::new(address, kind, record.index))
}

#[cfg(test)]
#[path = "addr_tests.rs"]
mod tests;
