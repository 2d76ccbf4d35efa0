//! Error types for lineage operations.

use crate::domain::ObjectId;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// The error type for lineage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or decoding the cache artifact failed.
    #[error("Cache error: {0}")]
    Cache(#[from] lineage_cache::Error),

    /// The cache was readable but structurally invalid.
    #[error("Invalid lineage cache: {0}")]
    Load(#[from] LoadError),

    /// No object with this id exists in the active snapshot.
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// A query was issued before any cache generation was published.
    #[error("No lineage cache has been loaded")]
    NotLoaded,

    /// A caller-supplied deadline elapsed during traversal.
    #[error("Query deadline exceeded after {elapsed:?}")]
    DeadlineExceeded {
        /// Time spent before the query was aborted
        elapsed: Duration,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Structural integrity problems found while building a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The artifact contains no objects.
    #[error("cache contains no objects")]
    Empty,

    /// A required top-level section is absent.
    #[error("cache is missing the '{0}' section")]
    MissingSection(&'static str),

    /// Two objects share an id.
    #[error("duplicate object id: {0}")]
    DuplicateObject(ObjectId),

    /// An object-map key disagrees with the record's own id.
    #[error("object keyed as '{key}' declares id '{id}'")]
    ObjectKeyMismatch {
        /// Map key
        key: String,
        /// Id inside the record
        id: ObjectId,
    },

    /// An edge references an object that does not exist.
    #[error("dependency #{index} ({from} -> {to}) references unknown object '{missing}'")]
    DanglingEdge {
        /// Position of the edge in the edge list
        index: usize,
        /// Edge source
        from: ObjectId,
        /// Edge target
        to: ObjectId,
        /// The id that could not be resolved
        missing: ObjectId,
    },

    /// A column dependency references an object that does not exist.
    #[error("column dependency #{index} references unknown object '{object}'")]
    DanglingColumnDependency {
        /// Position of the record in the column dependency list
        index: usize,
        /// The id that could not be resolved
        object: ObjectId,
    },
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file is not valid YAML for [`crate::config::LineageConfig`].
    #[error("Invalid configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A setting has an unusable value.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// A specialized Result type for lineage operations.
pub type Result<T> = std::result::Result<T, Error>;
