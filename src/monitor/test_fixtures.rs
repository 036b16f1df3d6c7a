//! Scripted transport for watcher tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cancel::Cancellation;
use crate::netlink::{Connect, RawMessage, Transport, TransportError};

/// One scripted outcome of `read_raw`.
#[derive(Debug)]
pub enum Step {
    /// Return these messages.
    Batch(Vec<RawMessage>),
    /// Fail with this error.
    Fail(TransportError),
}

/// Call counters shared between a connector, its transport and the test.
#[derive(Debug, Default)]
pub struct Calls {
    connects: AtomicUsize,
    reads: AtomicUsize,
    closes: AtomicUsize,
}

impl Calls {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Connector handing out a [`MockTransport`] with a fixed script.
///
/// Once the script runs out, reads block until cancellation, like a quiet
/// kernel socket.
#[derive(Debug, Default)]
pub struct MockConnector {
    calls: Arc<Calls>,
    script: Mutex<Vec<Step>>,
    fail_connect: bool,
    fail_close: bool,
}

impl MockConnector {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }
}

impl Connect for MockConnector {
    type Transport = MockTransport;

    fn connect(&self) -> Result<MockTransport, TransportError> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(TransportError::Socket {
                op: "socket",
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }

        let steps = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(MockTransport {
            calls: Arc::clone(&self.calls),
            steps: steps.into(),
            fail_close: self.fail_close,
        })
    }
}

#[derive(Debug)]
pub struct MockTransport {
    calls: Arc<Calls>,
    steps: VecDeque<Step>,
    fail_close: bool,
}

impl Transport for MockTransport {
    async fn read_raw(
        &mut self,
        cancel: &Cancellation,
    ) -> Result<Vec<RawMessage>, TransportError> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        match self.steps.pop_front() {
            Some(Step::Batch(messages)) => Ok(messages),
            Some(Step::Fail(error)) => Err(error),
            None => {
                cancel.cancelled().await;
                Err(TransportError::Cancelled)
            }
        }
    }

    fn close(self) -> Result<(), TransportError> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(TransportError::Close(io::Error::other("close failed")));
        }
        Ok(())
    }
}
