//! Default values for configuration options.

use crate::netlink::{self, IpVersion};
use crate::output::OutputFormat;

/// Default address families.
pub const IP_VERSION: IpVersion = IpVersion::Both;

/// Default output format.
pub const FORMAT: OutputFormat = OutputFormat::Text;

/// Default receive buffer size in bytes.
pub const BUFFER_SIZE: usize = netlink::DEFAULT_BUFFER_SIZE;

/// Smallest accepted receive buffer.
///
/// One kernel address message with cache info and flags attributes already
/// exceeds 64 bytes, and `recv(2)` truncates a datagram that does not fit.
pub const MIN_BUFFER_SIZE: usize = 512;

/// Largest accepted receive buffer (1 MiB).
pub const MAX_BUFFER_SIZE: usize = 1 << 20;

/// Default path written by `init`.
pub const CONFIG_FILE: &str = "addr-watch.toml";
