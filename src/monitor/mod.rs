//! Watcher layer for interface address changes.
//!
//! This module provides types and functions for:
//! - Representing address events ([`AddressEvent`], [`ChangeKind`])
//! - Running a watch session ([`AddressWatcher`], [`WatcherState`])
//! - Delivering events ([`EventSink`], [`ChannelSink`], [`WatchStream`])
//! - Stopping a session ([`Cancellation`], [`CancelHandle`])
//! - Error handling ([`WatchError`])

mod error;
mod sink;
mod stream;
mod watcher;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use crate::cancel::{CancelHandle, Cancellation};
pub use crate::event::{AddressEvent, ChangeKind};
pub use error::WatchError;
pub use sink::{ChannelSink, EventSink};
pub use stream::WatchStream;
pub use watcher::{AddressWatcher, WatcherState};
