//! Error types for the GooglBot console.

use googl_core::StoreError;
use thiserror::Error;

/// Errors that end a session
#[derive(Error, Debug)]
pub enum Error {
    /// Console read or write failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge base could not be loaded or saved
    #[error("knowledge store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid command-line configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using the bot Error.
pub type Result<T> = std::result::Result<T, Error>;
