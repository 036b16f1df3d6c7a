//! Linux routing netlink socket.
//!
//! Wraps an `AF_NETLINK`/`NETLINK_ROUTE` socket bound to the address change
//! multicast groups.
//!
//! # Cancellation
//!
//! `recv(2)` on this socket blocks and offers no cancel handle. Each read is
//! therefore issued on its own thread and raced against the caller's
//! [`Cancellation`]. When cancellation wins, the read is abandoned, not
//! stopped: its thread stays parked in the kernel until data arrives or the
//! descriptor goes away, and its result is discarded. The descriptor is
//! shared with that thread, so it is never closed underneath it or reused
//! while it is still reading.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd};
use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;

use super::{
    Connect, DEFAULT_BUFFER_SIZE, IpVersion, RawMessage, Transport, TransportError,
    parse_messages,
};
use crate::cancel::Cancellation;

#[allow(clippy::cast_possible_truncation)]
const SOCKADDR_NL_LEN: libc::socklen_t = std::mem::size_of::<libc::sockaddr_nl>() as libc::socklen_t;

/// A routing netlink socket subscribed to multicast groups.
///
/// Dropping the socket without calling [`Transport::close`] still releases
/// the descriptor.
#[derive(Debug)]
pub struct NetlinkSocket {
    fd: Arc<OwnedFd>,
    groups: u32,
    buffer_size: usize,
}

impl NetlinkSocket {
    /// Opens a socket bound to `groups` with the default receive buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Socket`] if `socket(2)` or `bind(2)` fails.
    pub fn bind(groups: u32) -> Result<Self, TransportError> {
        Self::bind_with_buffer(groups, DEFAULT_BUFFER_SIZE)
    }

    /// Opens a socket bound to `groups`, reading up to `buffer_size` bytes
    /// per datagram.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Socket`] if `socket(2)` or `bind(2)` fails.
    /// The descriptor is closed again when binding fails.
    pub fn bind_with_buffer(groups: u32, buffer_size: usize) -> Result<Self, TransportError> {
        // SAFETY: plain syscall with constant arguments; the result is checked.
        let raw = unsafe {
            libc::socket(
                libc::AF_NETLINK,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                libc::NETLINK_ROUTE,
            )
        };
        if raw < 0 {
            return Err(TransportError::Socket {
                op: "socket",
                source: io::Error::last_os_error(),
            });
        }

        // SAFETY: `raw` is a freshly created descriptor nothing else owns.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        // SAFETY: all-zero is a valid `sockaddr_nl`.
        let mut addr: libc::sockaddr_nl = unsafe { std::mem::zeroed() };
        addr.nl_family = libc::sa_family_t::try_from(libc::AF_NETLINK).unwrap_or_default();
        addr.nl_pid = 0;
        addr.nl_groups = groups;

        // SAFETY: `addr` is a valid `sockaddr_nl` and the length matches it.
        let ret = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                std::ptr::from_ref(&addr).cast::<libc::sockaddr>(),
                SOCKADDR_NL_LEN,
            )
        };
        if ret < 0 {
            return Err(TransportError::Socket {
                op: "bind",
                source: io::Error::last_os_error(),
            });
        }

        Ok(Self {
            fd: Arc::new(fd),
            groups,
            buffer_size,
        })
    }

    /// The multicast group bitmask the socket is bound to.
    #[must_use]
    pub const fn groups(&self) -> u32 {
        self.groups
    }

    /// Maximum number of bytes read per datagram.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

/// Performs one blocking `recv(2)`, retrying on `EINTR`.
fn recv_blocking(fd: &OwnedFd, buffer_size: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; buffer_size];
    loop {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes during the call.
        let n = unsafe {
            libc::recv(
                fd.as_raw_fd(),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
                0,
            )
        };

        if let Ok(len) = usize::try_from(n) {
            buf.truncate(len);
            return Ok(buf);
        }

        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

impl Transport for NetlinkSocket {
    async fn read_raw(
        &mut self,
        cancel: &Cancellation,
    ) -> Result<Vec<RawMessage>, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let (tx, rx) = oneshot::channel();
        let fd = Arc::clone(&self.fd);
        let buffer_size = self.buffer_size;

        thread::Builder::new()
            .name("netlink-read".to_string())
            .spawn(move || {
                let result = recv_blocking(&fd, buffer_size);
                drop(fd);
                let _ = tx.send(result);
            })
            .map_err(TransportError::Read)?;

        let received = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                tracing::trace!("Netlink read abandoned on cancellation");
                return Err(TransportError::Cancelled);
            }

            received = rx => received,
        };

        let bytes = match received {
            Ok(result) => result.map_err(TransportError::Read)?,
            Err(_) => {
                return Err(TransportError::Read(io::Error::other(
                    "read thread exited without a result",
                )));
            }
        };

        parse_messages(&bytes).map_err(TransportError::Frame)
    }

    /// Closes the descriptor, or hands the last reference to a read that is
    /// still parked in `recv(2)`. In the second case the socket stays bound
    /// until the next datagram wakes that read.
    fn close(self) -> Result<(), TransportError> {
        match Arc::try_unwrap(self.fd) {
            Ok(fd) => {
                let raw = fd.into_raw_fd();
                // SAFETY: `raw` came from `into_raw_fd`, so nothing else closes it.
                if unsafe { libc::close(raw) } < 0 {
                    return Err(TransportError::Close(io::Error::last_os_error()));
                }
                Ok(())
            }
            Err(shared) => {
                tracing::debug!("Netlink read still pending, descriptor closes when it returns");
                drop(shared);
                Ok(())
            }
        }
    }
}

/// Opens [`NetlinkSocket`]s for a watcher session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetlinkConnector {
    groups: u32,
    buffer_size: usize,
}

impl NetlinkConnector {
    /// Creates a connector for an explicit multicast group bitmask.
    #[must_use]
    pub const fn new(groups: u32) -> Self {
        Self {
            groups,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Creates a connector subscribed to the address groups of `version`.
    #[must_use]
    pub const fn for_version(version: IpVersion) -> Self {
        Self::new(version.multicast_groups())
    }

    /// Sets the receive buffer size.
    #[must_use]
    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// The multicast group bitmask sockets are bound to.
    #[must_use]
    pub const fn groups(&self) -> u32 {
        self.groups
    }

    /// The receive buffer size of opened sockets.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl Default for NetlinkConnector {
    fn default() -> Self {
        Self::for_version(IpVersion::Both)
    }
}

impl Connect for NetlinkConnector {
    type Transport = NetlinkSocket;

    fn connect(&self) -> Result<NetlinkSocket, TransportError> {
        let socket = NetlinkSocket::bind_with_buffer(self.groups, self.buffer_size)?;
        tracing::debug!(
            "Netlink socket bound (groups: {:#x}, buffer: {} bytes)",
            self.groups,
            self.buffer_size
        );
        Ok(socket)
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
