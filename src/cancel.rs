//! Cooperative cancellation signal.

use tokio::sync::watch;

/// Observing half of a cancellation signal.
///
/// Cheap to clone; every clone observes the same signal. Once cancelled, a
/// signal stays cancelled.
#[derive(Debug, Clone)]
pub struct Cancellation {
    receiver: watch::Receiver<bool>,
}

/// Triggering half of a cancellation signal.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] leaves the
/// signal un-triggered forever.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl Cancellation {
    /// Creates a linked handle/signal pair.
    #[must_use]
    pub fn new() -> (CancelHandle, Self) {
        let (sender, receiver) = watch::channel(false);
        (CancelHandle { sender }, Self { receiver })
    }

    /// A signal that can never fire.
    #[must_use]
    pub fn never() -> Self {
        let (_, signal) = Self::new();
        signal
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes once cancellation is requested.
    ///
    /// Returns immediately if it already was; never completes if the handle
    /// was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        let closed = receiver.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

impl CancelHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}
