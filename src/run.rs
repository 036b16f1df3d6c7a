//! Application execution logic.
//!
//! This module wires the validated configuration to a netlink watcher,
//! prints events to stdout, and stops the watcher on Ctrl+C or SIGTERM.

use thiserror::Error;
use tokio::signal;

use addr_watch::config::ValidatedConfig;
use addr_watch::monitor::{AddressWatcher, CancelHandle, Cancellation, EventSink, WatchError};
use addr_watch::netlink::Connect;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The watch session failed.
    #[error("Watcher failed: {0}")]
    Watch(#[from] WatchError),

    /// The platform has no rtnetlink.
    #[cfg(not(target_os = "linux"))]
    #[error("Address watching is only supported on Linux")]
    Unsupported,
}

/// Executes the watcher until a shutdown signal or a session error.
///
/// # Errors
///
/// Returns an error if the netlink socket cannot be opened, or if the
/// session fails while reading, decoding or closing.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - A live netlink socket
/// - Real async runtime with signal handling
#[cfg(all(target_os = "linux", not(tarpaulin_include)))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    use addr_watch::netlink::NetlinkConnector;
    use addr_watch::output::EventPrinter;

    let connector =
        NetlinkConnector::for_version(config.ip_version).with_buffer_size(config.buffer_size);
    let (handle, cancel) = Cancellation::new();
    tokio::spawn(cancel_on_shutdown(handle));

    tracing::info!("Watching {} address changes", config.ip_version);
    let mut printer = EventPrinter::new(std::io::stdout(), config.format);
    watch(connector, &cancel, &mut printer).await?;
    tracing::info!("Watcher stopped");

    Ok(())
}

/// Fails immediately: there is no rtnetlink to watch.
#[cfg(all(not(target_os = "linux"), not(tarpaulin_include)))]
#[allow(clippy::unused_async)]
pub async fn execute(_config: ValidatedConfig) -> Result<(), RunError> {
    Err(RunError::Unsupported)
}

/// Runs one watch session to completion.
async fn watch<C, S>(connector: C, cancel: &Cancellation, sink: &mut S) -> Result<(), RunError>
where
    C: Connect,
    S: EventSink,
{
    let mut watcher = AddressWatcher::new(connector);
    watcher.start(cancel, sink).await?;
    Ok(())
}

/// Cancels the watcher once a shutdown signal arrives.
#[cfg(not(tarpaulin_include))]
async fn cancel_on_shutdown(handle: CancelHandle) {
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");
    handle.cancel();
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
