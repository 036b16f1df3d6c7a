//! Event sinks: where a watcher delivers decoded events.

use tokio::sync::mpsc;

use super::AddressEvent;

/// Receives address events from a watcher.
///
/// Called synchronously, once per event, in kernel order, never
/// concurrently. A slow sink slows the watcher down; there is no buffering
/// between the decoder and the sink.
///
/// Any `FnMut(AddressEvent)` closure is a sink.
///
/// # Example
///
/// ```
/// use addr_watch::monitor::{AddressEvent, EventSink};
///
/// let mut seen = Vec::new();
/// let mut sink = |event: AddressEvent| seen.push(event);
/// sink.handle(AddressEvent::added([10, 0, 0, 5], 3));
/// assert_eq!(seen.len(), 1);
/// ```
pub trait EventSink {
    /// Handles one event.
    fn handle(&mut self, event: AddressEvent);
}

impl<F> EventSink for F
where
    F: FnMut(AddressEvent),
{
    fn handle(&mut self, event: AddressEvent) {
        self(event);
    }
}

/// Sink that forwards events into an unbounded channel.
///
/// Decouples the watcher from an asynchronous consumer. Events sent after
/// the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<AddressEvent>,
}

impl ChannelSink {
    /// Creates a sink feeding `sender`.
    #[must_use]
    pub const fn new(sender: mpsc::UnboundedSender<AddressEvent>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiver it feeds.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AddressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl EventSink for ChannelSink {
    fn handle(&mut self, event: AddressEvent) {
        if let Err(mpsc::error::SendError(event)) = self.sender.send(event) {
            tracing::debug!("Event receiver dropped, discarding {event}");
        }
    }
}
