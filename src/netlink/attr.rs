//! Routing attribute (`rtattr`) walking.

use super::{ParseError, RTA_HDRLEN, align};

/// Attribute type flag marking nested attributes.
const NLA_F_NESTED: u16 = 1 << 15;

/// Attribute type flag marking network byte order payloads.
const NLA_F_NET_BYTEORDER: u16 = 1 << 14;

/// Mask that strips the flag bits from an attribute type.
const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

/// Iterator over the type/value attributes in a payload.
///
/// Yields `(type, value)` pairs with flag bits masked off. Unknown types are
/// yielded like any other, so callers skip them by ignoring them. The first
/// inconsistency ends the iteration with a [`ParseError`].
#[derive(Debug, Clone)]
pub struct AttributeIter<'a> {
    data: &'a [u8],
    failed: bool,
}

impl<'a> AttributeIter<'a> {
    /// Creates an iterator over `data`, which must start at an attribute header.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            failed: false,
        }
    }

    fn fail(&mut self, error: ParseError) -> Option<Result<(u16, &'a [u8]), ParseError>> {
        self.failed = true;
        self.data = &[];
        Some(Err(error))
    }
}

impl<'a> Iterator for AttributeIter<'a> {
    type Item = Result<(u16, &'a [u8]), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.data.is_empty() {
            return None;
        }

        let Some(header) = self.data.get(..RTA_HDRLEN) else {
            let actual = self.data.len();
            return self.fail(ParseError::new("attribute header", RTA_HDRLEN, actual));
        };

        let len = usize::from(u16::from_ne_bytes([header[0], header[1]]));
        let kind = u16::from_ne_bytes([header[2], header[3]]) & NLA_TYPE_MASK;

        if len < RTA_HDRLEN {
            return self.fail(ParseError::new("attribute", RTA_HDRLEN, len));
        }
        if len > self.data.len() {
            let actual = self.data.len();
            return self.fail(ParseError::new("attribute", len, actual));
        }

        let value = &self.data[RTA_HDRLEN..len];
        self.data = &self.data[align(len).min(self.data.len())..];

        Some(Ok((kind, value)))
    }
}

/// Appends one attribute in wire form, padded to alignment.
///
/// # Panics
///
/// Panics if `value` is longer than an attribute length can express.
#[cfg(test)]
pub(crate) fn encode_attribute(out: &mut Vec<u8>, kind: u16, value: &[u8]) {
    let len = u16::try_from(RTA_HDRLEN + value.len()).expect("attribute too long");
    let start = out.len();
    out.extend_from_slice(&len.to_ne_bytes());
    out.extend_from_slice(&kind.to_ne_bytes());
    out.extend_from_slice(value);
    out.resize(start + align(out.len() - start), 0);
}
