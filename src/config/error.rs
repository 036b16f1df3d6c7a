//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid IP version value.
    #[error("Invalid IP version '{value}': expected ipv4, ipv6, or both")]
    InvalidIpVersion {
        /// The invalid value provided
        value: String,
    },

    /// Invalid output format value.
    #[error("Invalid output format '{value}': expected text or json")]
    InvalidFormat {
        /// The invalid value provided
        value: String,
    },

    /// Receive buffer size out of range.
    #[error("Invalid buffer size {value}: must be between {min} and {max} bytes")]
    InvalidBufferSize {
        /// The rejected size
        value: usize,
        /// Smallest accepted size
        min: usize,
        /// Largest accepted size
        max: usize,
    },
}
