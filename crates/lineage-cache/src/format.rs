//! Cache artifact encodings.

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// Encoding of a lineage cache artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheFormat {
    /// A single JSON document with `metadata`, `objects` and `dependencies` sections.
    Json,

    /// One tagged JSON record per line.
    JsonLines,
}

impl CacheFormat {
    /// Infer the encoding from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] when the extension is missing or unknown.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("jsonl" | "ndjson") => Ok(Self::JsonLines),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl fmt::Display for CacheFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::JsonLines => write!(f, "jsonl"),
        }
    }
}
