//! Netlink message framing.

use super::{NLMSG_HDRLEN, ParseError, align};

/// Netlink message header (mirrors `struct nlmsghdr`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Length of message including header.
    pub len: u32,
    /// Message type.
    pub kind: u16,
    /// Additional flags.
    pub flags: u16,
    /// Sequence number.
    pub seq: u32,
    /// Sending port ID.
    pub port: u32,
}

impl MessageHeader {
    /// Parses a header from the front of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if fewer than [`NLMSG_HDRLEN`] bytes are available.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let Some(bytes) = data.get(..NLMSG_HDRLEN) else {
            return Err(ParseError::new("message header", NLMSG_HDRLEN, data.len()));
        };

        Ok(Self {
            len: u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            kind: u16::from_ne_bytes([bytes[4], bytes[5]]),
            flags: u16::from_ne_bytes([bytes[6], bytes[7]]),
            seq: u32::from_ne_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            port: u32::from_ne_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }

    /// Serializes the header in host byte order.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; NLMSG_HDRLEN] {
        let mut out = [0u8; NLMSG_HDRLEN];
        out[0..4].copy_from_slice(&self.len.to_ne_bytes());
        out[4..6].copy_from_slice(&self.kind.to_ne_bytes());
        out[6..8].copy_from_slice(&self.flags.to_ne_bytes());
        out[8..12].copy_from_slice(&self.seq.to_ne_bytes());
        out[12..16].copy_from_slice(&self.port.to_ne_bytes());
        out
    }
}

/// One message as returned by a kernel read: header plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// The message header.
    pub header: MessageHeader,
    /// Payload bytes (`len - NLMSG_HDRLEN`), without trailing padding.
    pub payload: Vec<u8>,
}

impl RawMessage {
    /// Creates a message of the given type, computing the header length.
    #[must_use]
    pub fn new(kind: u16, payload: Vec<u8>) -> Self {
        let len = u32::try_from(NLMSG_HDRLEN + payload.len()).unwrap_or(u32::MAX);
        Self {
            header: MessageHeader {
                len,
                kind,
                ..MessageHeader::default()
            },
            payload,
        }
    }

    /// Returns the message type from the header.
    #[must_use]
    pub const fn kind(&self) -> u16 {
        self.header.kind
    }

    /// Appends the wire form of this message, padded to alignment.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.payload);
        out.resize(start + align(out.len() - start), 0);
    }
}

/// Splits a received buffer into its netlink messages, preserving order.
///
/// Each message advances the cursor by its aligned length, clipped to the
/// end of `buf`. A buffer ending in a partial header is rejected rather than
/// silently shortened.
///
/// # Errors
///
/// Returns [`ParseError`] if a declared length is smaller than the header,
/// runs past the buffer, or the buffer ends in a partial header.
pub fn parse_messages(buf: &[u8]) -> Result<Vec<RawMessage>, ParseError> {
    let mut messages = Vec::new();
    let mut rest = buf;

    while !rest.is_empty() {
        let header = MessageHeader::parse(rest)?;
        let len = header.len as usize;

        if len < NLMSG_HDRLEN {
            return Err(ParseError::new("message", NLMSG_HDRLEN, len));
        }
        if len > rest.len() {
            return Err(ParseError::new("message", len, rest.len()));
        }

        messages.push(RawMessage {
            header,
            payload: rest[NLMSG_HDRLEN..len].to_vec(),
        });

        rest = &rest[align(len).min(rest.len())..];
    }

    Ok(messages)
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
