//! Reading pre-computed lineage cache artifacts.
//!
//! The lineage extractors emit one of two encodings:
//!
//! - a single JSON document (`.json`) holding metadata, objects and dependencies
//! - JSON Lines (`.jsonl`) with one tagged record per line
//!
//! This crate only knows how to get bytes off disk, fingerprint them and decode
//! them into caller-supplied serde types. Validation of the decoded records
//! belongs to the `lineage` crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod format;
pub mod reader;

pub use artifact::{read_artifact, RawArtifact};
pub use error::{Error, Result};
pub use format::CacheFormat;
pub use reader::{decode_document, decode_lines, JsonlReader};
