//! Error types for bta-cli

use thiserror::Error;

use crate::scanner::ScanError;

/// Batch driver error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Input folder could not be scanned
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Recording, configuration or parameter error from bta-common
    #[error(transparent)]
    Common(#[from] bta_common::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialised
    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for the batch driver
pub type CliResult<T> = Result<T, CliError>;
