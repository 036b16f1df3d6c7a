//! Error types for the watcher lifecycle.

use thiserror::Error;

use super::WatcherState;
use crate::netlink::{DecodeError, TransportError};

/// Error type for a watcher session.
///
/// Every failure of a session ends up here; nothing is logged or dropped
/// along the way. Cancellation is not an error: a cancelled session returns
/// `Ok(())`.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The transport could not be opened. No teardown was attempted.
    #[error("setting up netlink listener: {0}")]
    Prepare(#[source] TransportError),

    /// A kernel read failed.
    #[error("reading netlink msg: {0}")]
    Read(#[source] TransportError),

    /// A received message could not be decoded.
    #[error("decoding netlink msg: {0}")]
    Decode(#[from] DecodeError),

    /// Closing the transport failed.
    ///
    /// `during` holds the error the session was already ending with, if any.
    #[error("tearing down: {source}{}", while_handling(.during.as_deref()))]
    Teardown {
        /// The close failure.
        #[source]
        source: TransportError,
        /// The session error being returned when teardown failed.
        during: Option<Box<WatchError>>,
    },

    /// `start` was called on a watcher that already ran.
    #[error("watcher cannot start from state {0}")]
    InvalidState(WatcherState),

    /// The task running a spawned watcher panicked or was aborted.
    #[error("watcher task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn while_handling(during: Option<&WatchError>) -> String {
    during.map_or_else(String::new, |e| {
        format!(", while handling another error: {e}")
    })
}

impl WatchError {
    /// Composes a teardown failure with the session outcome it interrupted.
    #[must_use]
    pub fn teardown(source: TransportError, outcome: Result<(), Self>) -> Self {
        Self::Teardown {
            source,
            during: outcome.err().map(Box::new),
        }
    }

    /// The session error that was in flight when teardown failed.
    #[must_use]
    pub fn during(&self) -> Option<&Self> {
        match self {
            Self::Teardown { during, .. } => during.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the session ended on a malformed message, either while
    /// framing a datagram or while decoding a message.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Read(TransportError::Frame(_)) | Self::Decode(DecodeError::Malformed(_)) => true,
            Self::Teardown { during, .. } => during.as_deref().is_some_and(Self::is_malformed),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::ParseError;
    use std::error::Error;
    use std::io;

    fn close_error() -> TransportError {
        TransportError::Close(io::Error::other("bad descriptor"))
    }

    mod display {
        use super::*;

        #[test]
        fn read_error_is_prefixed() {
            let error = WatchError::Read(TransportError::Read(io::Error::other("boom")));

            assert_eq!(error.to_string(), "reading netlink msg: read: boom");
        }

        #[test]
        fn unexpected_type_is_reported() {
            let error = WatchError::from(DecodeError::UnexpectedMessageType(16));

            assert_eq!(
                error.to_string(),
                "decoding netlink msg: invalid netlink message type: 16"
            );
        }

        #[test]
        fn teardown_alone_names_only_the_close_failure() {
            let error = WatchError::teardown(close_error(), Ok(()));

            assert!(error.to_string().starts_with("tearing down: close: "));
            assert!(!error.to_string().contains("while handling"));
            assert!(error.during().is_none());
        }

        #[test]
        fn teardown_over_session_error_names_both() {
            let session = WatchError::Read(TransportError::Read(io::Error::other("boom")));
            let error = WatchError::teardown(close_error(), Err(session));

            let message = error.to_string();
            assert!(message.starts_with("tearing down: close: "));
            assert!(message.ends_with(", while handling another error: reading netlink msg: read: boom"));
        }

        #[test]
        fn invalid_state_names_the_state() {
            let error = WatchError::InvalidState(WatcherState::Stopped);

            assert_eq!(error.to_string(), "watcher cannot start from state Stopped");
        }
    }

    mod chain {
        use super::*;

        #[test]
        fn teardown_source_is_the_close_failure() {
            let error = WatchError::teardown(close_error(), Ok(()));

            let source = error.source().unwrap();
            assert!(source.to_string().starts_with("close: "));
        }

        #[test]
        fn teardown_keeps_the_original_error() {
            let session = WatchError::from(DecodeError::UnexpectedMessageType(24));
            let error = WatchError::teardown(close_error(), Err(session));

            assert!(matches!(
                error.during(),
                Some(WatchError::Decode(DecodeError::UnexpectedMessageType(24)))
            ));
        }

        #[test]
        fn read_preserves_transport_source() {
            let error = WatchError::Read(TransportError::Read(io::Error::other("inner")));

            assert!(error.source().unwrap().to_string().contains("inner"));
        }
    }

    mod malformed {
        use super::*;

        #[test]
        fn decode_malformed_is_malformed() {
            let error = WatchError::from(DecodeError::Malformed(ParseError::new("attribute", 8, 2)));

            assert!(error.is_malformed());
        }

        #[test]
        fn frame_error_is_malformed() {
            let error = WatchError::Read(TransportError::Frame(ParseError::new("message", 16, 4)));

            assert!(error.is_malformed());
        }

        #[test]
        fn teardown_looks_through_to_session_error() {
            let session = WatchError::from(DecodeError::Malformed(ParseError::new("x", 1, 0)));
            let error = WatchError::teardown(close_error(), Err(session));

            assert!(error.is_malformed());
        }

        #[test]
        fn other_errors_are_not_malformed() {
            let error = WatchError::from(DecodeError::UnexpectedMessageType(16));

            assert!(!error.is_malformed());
        }
    }
}
