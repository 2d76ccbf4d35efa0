//! Error types for lineage-cache operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for lineage-cache operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading the artifact.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing error in a whole-document artifact.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON Lines record could not be decoded.
    #[error("malformed record at line {line}: {source}")]
    Malformed {
        /// 1-based line number of the offending record.
        line: usize,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The artifact is structurally invalid.
    #[error("Invalid cache format: {0}")]
    InvalidFormat(String),

    /// The file extension does not name a known cache encoding.
    #[error("unsupported cache file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// A specialized Result type for lineage-cache operations.
pub type Result<T> = std::result::Result<T, Error>;
