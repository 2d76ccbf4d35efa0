//! Table-level dependency edges.

use super::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed edge from a provider object to a consumer object.
///
/// Several edges may connect the same ordered pair as long as their
/// `(dependency_type, reference_type)` differ; each is a distinct edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableLevelDependency {
    /// Provider object
    #[serde(alias = "source_object_id")]
    pub source_id: ObjectId,
    /// Consumer object
    #[serde(alias = "target_object_id")]
    pub target_id: ObjectId,
    /// Kind of relationship
    pub dependency_type: DependencyType,
    /// How the consumer references the provider
    pub reference_type: ReferenceType,
}

impl TableLevelDependency {
    /// Convenience constructor.
    pub fn new(
        source_id: impl Into<ObjectId>,
        target_id: impl Into<ObjectId>,
        dependency_type: DependencyType,
        reference_type: ReferenceType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            dependency_type,
            reference_type,
        }
    }
}

/// Generates a categorical label enum with a catch-all for labels we don't
/// know about. Unknown labels are carried through verbatim.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Any other label, kept as written
            Other(String),
        }

        impl $name {
            /// Wire label.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(label) => label,
                }
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                match label.as_str() {
                    $($label => Self::$variant,)+
                    _ => Self::Other(label),
                }
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self::from(label.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(label) => label,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// Kind of dependency between two objects.
    DependencyType {
        /// View reads from its sources
        View => "VIEW",
        /// ETL job moves data
        Etl => "ETL",
        /// Object uses a connection
        Connection => "CONNECTION",
        /// Table feeds a UDF
        UdfInput => "UDF_INPUT",
        /// UDF feeds a table
        UdfOutput => "UDF_OUTPUT",
        /// Foreign-key constraint
        Constraint => "CONSTRAINT",
        /// Generic usage
        Uses => "USES",
        /// Read access
        Reads => "READS",
        /// Write access
        Writes => "WRITES",
        /// Replication or sync job
        Sync => "SYNC",
    }
}

label_enum! {
    /// How a consumer references its provider.
    ReferenceType {
        /// Plain SELECT
        Select => "SELECT",
        /// INSERT ... SELECT
        InsertSelect => "INSERT_SELECT",
        /// Generic usage
        Uses => "USES",
        /// Passed as a UDF parameter
        Parameter => "PARAMETER",
        /// Plain INSERT
        Insert => "INSERT",
        /// Read by an orchestration DAG
        DagInput => "DAG_INPUT",
        /// Written by an orchestration DAG
        DagOutput => "DAG_OUTPUT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("VIEW", DependencyType::View)]
    #[case("UDF_OUTPUT", DependencyType::UdfOutput)]
    #[case("REPLICATES", DependencyType::Other("REPLICATES".into()))]
    fn dependency_type_from_label(#[case] label: &str, #[case] expected: DependencyType) {
        assert_eq!(DependencyType::from(label), expected);
        assert_eq!(expected.as_str(), label);
    }

    #[test]
    fn unknown_labels_survive_serialization() {
        let dep: TableLevelDependency = serde_json::from_str(
            r#"{"source_id":"A.T","target_id":"A.V","dependency_type":"MERGE","reference_type":"MERGE_INTO"}"#,
        )
        .unwrap();
        assert_eq!(dep.dependency_type, DependencyType::Other("MERGE".into()));

        let value = serde_json::to_value(&dep).unwrap();
        assert_eq!(value["dependency_type"], "MERGE");
        assert_eq!(value["reference_type"], "MERGE_INTO");
    }

    #[test]
    fn accepts_object_id_aliases() {
        let dep: TableLevelDependency = serde_json::from_str(
            r#"{"source_object_id":"A.T","target_object_id":"A.V","dependency_type":"VIEW","reference_type":"SELECT"}"#,
        )
        .unwrap();
        assert_eq!(dep.source_id.as_str(), "A.T");
        assert_eq!(dep.reference_type, ReferenceType::Select);
    }
}
