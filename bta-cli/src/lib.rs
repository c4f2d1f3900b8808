//! bta-cli library interface
//!
//! Batch driver over a folder of recording logs. Exposed as a library for
//! integration testing.

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod scanner;
pub mod summary;

pub use crate::error::{CliError, CliResult};
