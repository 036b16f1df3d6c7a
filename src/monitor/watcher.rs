//! Watcher lifecycle: prepare, read loop, teardown.

use std::fmt;

use super::{Cancellation, EventSink, WatchError};
use crate::netlink::{Connect, Transport, TransportError, decode};

/// Lifecycle phase of an [`AddressWatcher`].
///
/// `Unstarted → Running → Stopped`, never back. A stopped watcher must be
/// recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatcherState {
    /// Created, transport not yet opened.
    Unstarted,
    /// Transport open, read loop active.
    Running,
    /// Session over, transport closed.
    Stopped,
}

impl fmt::Display for WatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstarted => write!(f, "Unstarted"),
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Watches interface address changes for one session.
///
/// The watcher opens a transport through its [`Connect`] implementation,
/// reads and decodes messages until cancelled or until something fails, and
/// closes the transport exactly once on the way out.
///
/// # Failure Policy
///
/// There is no retry: any read or decode failure ends the session. A
/// corrupt stream is treated as unrecoverable for the session, so the rest
/// of a batch is not delivered after a decode error. Reconnecting is up to
/// the caller, with a new watcher.
///
/// # Example
///
/// ```no_run
/// # #[cfg(target_os = "linux")]
/// # async fn example() -> Result<(), addr_watch::monitor::WatchError> {
/// use addr_watch::monitor::{AddressEvent, AddressWatcher, Cancellation};
/// use addr_watch::netlink::NetlinkConnector;
///
/// let (handle, cancel) = Cancellation::new();
/// let mut watcher = AddressWatcher::new(NetlinkConnector::default());
///
/// watcher
///     .start(&cancel, &mut |event: AddressEvent| println!("{event}"))
///     .await?;
/// # drop(handle);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AddressWatcher<C> {
    connector: C,
    state: WatcherState,
}

impl<C: Connect> AddressWatcher<C> {
    /// Creates an unstarted watcher.
    #[must_use]
    pub const fn new(connector: C) -> Self {
        Self {
            connector,
            state: WatcherState::Unstarted,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> WatcherState {
        self.state
    }

    /// The connector used to open the transport.
    #[must_use]
    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Runs one session, delivering events to `sink` until `cancel` fires.
    ///
    /// Cancellation is checked before every read and raced against every
    /// pending read; a cancelled session returns `Ok(())`.
    ///
    /// If this future is dropped mid-session, or the sink panics, the
    /// transport is dropped instead of closed, which for
    /// [`NetlinkSocket`](crate::netlink::NetlinkSocket) still releases the
    /// descriptor.
    ///
    /// # Errors
    ///
    /// - [`WatchError::InvalidState`] if the watcher already ran
    /// - [`WatchError::Prepare`] if the transport cannot be opened; nothing
    ///   is torn down and the watcher stays `Unstarted`
    /// - [`WatchError::Read`] or [`WatchError::Decode`] if the session failed
    /// - [`WatchError::Teardown`] if closing failed, carrying the session
    ///   error (if any) as [`WatchError::during`]
    pub async fn start<S: EventSink>(
        &mut self,
        cancel: &Cancellation,
        sink: &mut S,
    ) -> Result<(), WatchError> {
        if self.state != WatcherState::Unstarted {
            return Err(WatchError::InvalidState(self.state));
        }

        let mut transport = self.connector.connect().map_err(WatchError::Prepare)?;
        self.state = WatcherState::Running;
        tracing::debug!("Watcher running");

        let outcome = run_loop(&mut transport, cancel, sink).await;

        self.state = WatcherState::Stopped;
        let result = teardown(transport, outcome);
        tracing::debug!("Watcher stopped");
        result
    }
}

/// Reads, decodes and dispatches until cancelled or failed.
async fn run_loop<T: Transport, S: EventSink>(
    transport: &mut T,
    cancel: &Cancellation,
    sink: &mut S,
) -> Result<(), WatchError> {
    loop {
        if cancel.is_cancelled() {
            return Ok(());
        }

        let messages = match transport.read_raw(cancel).await {
            Ok(messages) => messages,
            Err(TransportError::Cancelled) => return Ok(()),
            Err(e) => return Err(WatchError::Read(e)),
        };

        for message in &messages {
            sink.handle(decode(message)?);
        }
    }
}

/// Closes the transport, composing a close failure with the session outcome.
fn teardown<T: Transport>(transport: T, outcome: Result<(), WatchError>) -> Result<(), WatchError> {
    match transport.close() {
        Ok(()) => outcome,
        Err(e) => Err(WatchError::teardown(e, outcome)),
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
