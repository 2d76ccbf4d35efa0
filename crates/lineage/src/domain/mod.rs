//! Domain types for database lineage.
//!
//! A lineage cache describes database objects (tables, views, UDFs, virtual
//! schemas, connections, orchestration DAGs) and the directed dependencies
//! between them. Edges point from the provider to the consumer: a table read
//! by a view yields `TABLE -> VIEW`.

mod column;
mod dependency;
mod object;
pub(crate) mod timestamp;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub use column::{ColumnLevelDependency, ColumnRef};
pub use dependency::{DependencyType, ReferenceType, TableLevelDependency};
pub use object::{
    Column, ConnectionDetails, DagDetails, DatabaseObject, ObjectDetails, ObjectType, Parameter,
    Platform, TableDetails, UdfDetails, ViewDetails, VirtualSchemaDetails,
};

/// Globally unique identifier of a database object.
///
/// Conventionally `"<SCHEMA>.<NAME>"` for Exasol objects and
/// `"<platform>:<project>.<dataset>.<name>"` for other platforms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create a new object ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for ObjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
