//! Column-level lineage records.

use super::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One column feeding another column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnLevelDependency {
    /// Object owning the source column
    #[serde(rename = "source_object_id", alias = "source_object")]
    pub source_object: ObjectId,
    /// Source column name
    pub source_column: String,
    /// Object owning the target column
    #[serde(rename = "target_object_id", alias = "target_object")]
    pub target_object: ObjectId,
    /// Target column name
    pub target_column: String,
    /// Expression applied on the way, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
    /// `DIRECT`, `AGGREGATE`, `EXPRESSION`, ...
    #[serde(default = "default_transformation_type")]
    pub transformation_type: String,
}

fn default_transformation_type() -> String {
    "DIRECT".to_string()
}

impl ColumnLevelDependency {
    /// The source side as a column reference.
    #[must_use]
    pub fn source(&self) -> ColumnRef {
        ColumnRef::new(self.source_object.clone(), self.source_column.clone())
    }

    /// The target side as a column reference.
    #[must_use]
    pub fn target(&self) -> ColumnRef {
        ColumnRef::new(self.target_object.clone(), self.target_column.clone())
    }
}

/// A column addressed by its owning object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Owning object
    pub object_id: ObjectId,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    /// Create a column reference.
    pub fn new(object_id: impl Into<ObjectId>, column: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object_id, self.column)
    }
}
