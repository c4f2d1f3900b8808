//! Common error types for BTA

use std::path::PathBuf;

use thiserror::Error;

use crate::record::ParseError;
use crate::sample::Channel;

/// Common result type for BTA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the BTA crates
#[derive(Error, Debug)]
pub enum Error {
    /// Recording file contains a malformed line; nothing of it is kept
    #[error("Unreadable recording {}: {source}", file.display())]
    Unreadable {
        file: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Recording file could not be read from disk
    #[error("Cannot read recording {}: {source}", file.display())]
    FileIo {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A channel needed for maxima or detection holds no samples
    #[error("Empty channel: {channel}")]
    EmptyChannel { channel: Channel },

    /// Invalid analysis parameters
    #[error("Configuration error: {0}")]
    Config(String),
}
