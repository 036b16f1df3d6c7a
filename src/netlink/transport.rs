//! Transport seam between the watcher lifecycle and the kernel socket.

use std::future::Future;

use super::{RawMessage, TransportError};
use crate::cancel::Cancellation;

/// An open channel to the routing subsystem.
///
/// # Design
///
/// This trait abstracts the kernel socket, enabling:
/// - Dependency injection for testing with scripted transports
/// - Keeping protocol decoding independent of how bytes are read
///
/// Exactly one reader uses a transport at a time, and it is closed exactly
/// once by consuming it.
pub trait Transport: Send {
    /// Waits for the next batch of messages, or for cancellation.
    ///
    /// One call corresponds to one kernel read; the returned messages keep
    /// the order the kernel wrote them in.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Cancelled`] if `cancel` fired first
    /// - [`TransportError::Read`] if the read itself failed
    /// - [`TransportError::Frame`] if the datagram could not be framed
    fn read_raw(
        &mut self,
        cancel: &Cancellation,
    ) -> impl Future<Output = Result<Vec<RawMessage>, TransportError>> + Send;

    /// Releases the underlying channel.
    ///
    /// Release may be deferred. If an earlier [`read_raw`](Self::read_raw)
    /// was abandoned on cancellation and is still waiting in the kernel, the
    /// channel stays open, and subscribed, until that read returns. `close`
    /// reports `Ok` in that case without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Close`] if an immediate release failed.
    fn close(self) -> Result<(), TransportError>;
}

/// Opens transports; the "prepare" phase of a watcher session.
///
/// # Example
///
/// ```ignore
/// use addr_watch::netlink::{Connect, TransportError};
///
/// struct ScriptedConnector;
///
/// impl Connect for ScriptedConnector {
///     type Transport = ScriptedTransport;
///
///     fn connect(&self) -> Result<ScriptedTransport, TransportError> {
///         Ok(ScriptedTransport::default())
///     }
/// }
/// ```
pub trait Connect: Send + Sync {
    /// The transport type this connector opens.
    type Transport: Transport;

    /// Opens and subscribes a new transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Socket`] if the channel cannot be created
    /// or bound.
    fn connect(&self) -> Result<Self::Transport, TransportError>;
}
