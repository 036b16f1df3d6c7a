//! Stream adapter for a watcher running on its own task.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::{AddressEvent, AddressWatcher, Cancellation, ChannelSink, WatchError};
use crate::netlink::Connect;

/// Events from a watcher running on a spawned task.
///
/// Returned by [`AddressWatcher::spawn`]. The stream ends once the watcher
/// stops, for whatever reason; [`WatchStream::finish`] then yields the
/// session outcome.
#[derive(Debug)]
pub struct WatchStream {
    events: UnboundedReceiverStream<AddressEvent>,
    task: JoinHandle<Result<(), WatchError>>,
}

impl<C> AddressWatcher<C>
where
    C: Connect + 'static,
    C::Transport: 'static,
{
    /// Runs the watcher on a new tokio task and streams its events.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(mut self, cancel: Cancellation) -> WatchStream {
        let (mut sink, receiver) = ChannelSink::channel();
        let task = tokio::spawn(async move { self.start(&cancel, &mut sink).await });

        WatchStream {
            events: UnboundedReceiverStream::new(receiver),
            task,
        }
    }
}

impl WatchStream {
    /// Returns true once the watcher task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the watcher task and returns its outcome.
    ///
    /// Events not yet consumed are dropped.
    ///
    /// # Errors
    ///
    /// Returns the session error, or [`WatchError::Join`] if the task
    /// panicked or was aborted.
    pub async fn finish(self) -> Result<(), WatchError> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(WatchError::Join(e)),
        }
    }
}

impl Stream for WatchStream {
    type Item = AddressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}
