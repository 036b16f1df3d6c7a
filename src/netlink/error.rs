//! Error types for the netlink layer.

use std::io;
use thiserror::Error;

/// A buffer did not hold what its headers declared.
///
/// Raised instead of reading past the end of the provided bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed netlink message: {what} needs {expected} bytes, {actual} available")]
pub struct ParseError {
    /// The structure being parsed.
    pub what: &'static str,
    /// Number of bytes the structure required.
    pub expected: usize,
    /// Number of bytes actually available.
    pub actual: usize,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub const fn new(what: &'static str, expected: usize, actual: usize) -> Self {
        Self {
            what,
            expected,
            actual,
        }
    }
}

/// Error type for decoding a single address message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload was truncated or its attributes were inconsistent.
    #[error(transparent)]
    Malformed(#[from] ParseError),

    /// The message type is neither "new address" nor "delete address".
    #[error("invalid netlink message type: {0}")]
    UnexpectedMessageType(u16),
}

/// Error type for the kernel transport.
///
/// `Cancelled` is not a failure: it reports that the caller's cancellation
/// signal won the race against a pending read.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket creation or bind failed.
    #[error("{op}: {source}")]
    Socket {
        /// The syscall that failed.
        op: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The kernel read failed.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// The received datagram could not be split into messages.
    #[error("parse: {0}")]
    Frame(#[source] ParseError),

    /// Cancellation was signalled before the read completed.
    #[error("read cancelled")]
    Cancelled,

    /// Releasing the socket descriptor failed.
    #[error("close: {0}")]
    Close(#[source] io::Error),
}

impl TransportError {
    /// Returns true if this error only reports cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
