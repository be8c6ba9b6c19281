//! Startup error types
//!
//! Everything that can fail in this crate fails before the game loop starts:
//! opening the physical-memory device, mapping the GPIO block, bringing up
//! the LCD, or loading configuration. Register accesses and LCD transfers have no error path.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::hal::Pin;

/// Fatal hardware initialization failures
#[derive(Debug, Error)]
pub enum InitError {
    /// The memory device could not be opened (usually: not running as root)
    #[error("failed to open {}", path.display())]
    DeviceOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// mmap of the GPIO register window failed
    #[error("failed to map GPIO registers at {addr:#010x}")]
    MapFailed {
        addr: u64,
        #[source]
        source: io::Error,
    },

    /// An LCD line is wired to a pin already claimed by the rig
    #[error("LCD wiring conflict on {pin}")]
    LcdWiring { pin: Pin },
}

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),

    #[error("unknown board profile: {0} (use --list-boards to see available profiles)")]
    UnknownBoard(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
