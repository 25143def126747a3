//! Storage error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving a knowledge base.
///
/// A missing file is not an error: it loads as an empty base.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File exists but could not be read
    #[error("failed to read knowledge base {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File contents are not a valid knowledge base
    #[error("failed to parse knowledge base {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File could not be created or written
    #[error("failed to write knowledge base {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Knowledge base could not be encoded
    #[error("failed to serialize knowledge base {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
