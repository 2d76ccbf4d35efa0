//! Database objects (graph nodes).

use super::timestamp;
use super::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A database object: one node of the lineage graph.
///
/// Attributes shared by every kind of object live directly on this struct;
/// attributes that only make sense for one kind live in [`ObjectDetails`],
/// which is selected by the `type` field of the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseObject {
    /// Unique identifier
    pub id: ObjectId,

    /// Schema (Exasol) or `project.dataset` (BigQuery)
    #[serde(alias = "schema_name")]
    pub schema: String,

    /// Object name within its schema
    pub name: String,

    /// Source platform, when the cache spans several
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Owning user
    #[serde(default)]
    pub owner: String,

    /// Numeric id assigned by the source database or extractor
    #[serde(rename = "object_id", default)]
    pub internal_id: i64,

    /// Creation timestamp
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification timestamp
    #[serde(default, with = "timestamp::optional")]
    pub modified_at: Option<DateTime<Utc>>,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Type-specific attributes
    #[serde(flatten)]
    pub details: ObjectDetails,
}

impl DatabaseObject {
    /// The object's type tag.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.details.object_type()
    }

    /// Column list for tables and views; empty for other kinds.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        match &self.details {
            ObjectDetails::Table(t) | ObjectDetails::BigqueryTable(t) => &t.columns,
            ObjectDetails::View(v) | ObjectDetails::BigqueryView(v) => &v.columns,
            _ => &[],
        }
    }
}

/// Type-specific attributes, tagged by the object's `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectDetails {
    /// Exasol table
    Table(TableDetails),
    /// Exasol view
    View(ViewDetails),
    /// Exasol Lua user-defined function
    LuaUdf(UdfDetails),
    /// Exasol virtual schema
    VirtualSchema(VirtualSchemaDetails),
    /// Exasol connection object
    Connection(ConnectionDetails),
    /// BigQuery table
    BigqueryTable(TableDetails),
    /// BigQuery view
    BigqueryView(ViewDetails),
    /// BigQuery user-defined function
    BigqueryUdf(UdfDetails),
    /// BigQuery stored procedure
    BigqueryProcedure(UdfDetails),
    /// Cloud Composer (Airflow) DAG
    ComposerDag(DagDetails),
}

impl ObjectDetails {
    /// The type tag corresponding to this variant.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Table(_) => ObjectType::Table,
            Self::View(_) => ObjectType::View,
            Self::LuaUdf(_) => ObjectType::LuaUdf,
            Self::VirtualSchema(_) => ObjectType::VirtualSchema,
            Self::Connection(_) => ObjectType::Connection,
            Self::BigqueryTable(_) => ObjectType::BigqueryTable,
            Self::BigqueryView(_) => ObjectType::BigqueryView,
            Self::BigqueryUdf(_) => ObjectType::BigqueryUdf,
            Self::BigqueryProcedure(_) => ObjectType::BigqueryProcedure,
            Self::ComposerDag(_) => ObjectType::ComposerDag,
        }
    }
}

/// Attributes of tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDetails {
    /// Columns in ordinal order
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Row count at extraction time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    /// Storage size at extraction time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Attributes of views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewDetails {
    /// View definition SQL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Output columns
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Attributes of UDFs and procedures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UdfDetails {
    /// `SCALAR` or `SET`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udf_type: Option<String>,
    /// Input parameters
    #[serde(default)]
    pub input_parameters: Vec<Parameter>,
    /// Emitted columns
    #[serde(default)]
    pub output_columns: Vec<Parameter>,
    /// Script language (LUA, PYTHON, SQL, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_language: Option<String>,
    /// Script body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_text: Option<String>,
}

/// Attributes of virtual schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualSchemaDetails {
    /// Adapter script name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_name: Option<String>,
    /// Connection the adapter uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,
    /// Schema on the remote system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_schema: Option<String>,
    /// Adapter properties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// Attributes of connection objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    /// JDBC-style connection string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    /// Login user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Attributes of orchestration DAGs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagDetails {
    /// Schedule interval expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// A table or view column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// SQL data type
    #[serde(default)]
    pub data_type: String,
    /// 1-based position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal_position: Option<u32>,
    /// Whether NULL is allowed
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
    /// Whether the column is part of the primary key
    #[serde(default)]
    pub is_primary_key: bool,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// A UDF input parameter or output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// SQL data type
    #[serde(default)]
    pub data_type: String,
}

/// Platform an object was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Exasol
    Exasol,
    /// Google BigQuery
    Bigquery,
    /// Google Cloud Composer
    Composer,
}

/// Object type tag, without the type-specific payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    /// Exasol table
    Table,
    /// Exasol view
    View,
    /// Exasol Lua UDF
    LuaUdf,
    /// Exasol virtual schema
    VirtualSchema,
    /// Exasol connection
    Connection,
    /// BigQuery table
    BigqueryTable,
    /// BigQuery view
    BigqueryView,
    /// BigQuery UDF
    BigqueryUdf,
    /// BigQuery procedure
    BigqueryProcedure,
    /// Composer DAG
    ComposerDag,
}

impl ObjectType {
    /// Every type, in declaration order.
    pub const ALL: [ObjectType; 10] = [
        Self::Table,
        Self::View,
        Self::LuaUdf,
        Self::VirtualSchema,
        Self::Connection,
        Self::BigqueryTable,
        Self::BigqueryView,
        Self::BigqueryUdf,
        Self::BigqueryProcedure,
        Self::ComposerDag,
    ];

    /// Wire name, e.g. `LUA_UDF`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::LuaUdf => "LUA_UDF",
            Self::VirtualSchema => "VIRTUAL_SCHEMA",
            Self::Connection => "CONNECTION",
            Self::BigqueryTable => "BIGQUERY_TABLE",
            Self::BigqueryView => "BIGQUERY_VIEW",
            Self::BigqueryUdf => "BIGQUERY_UDF",
            Self::BigqueryProcedure => "BIGQUERY_PROCEDURE",
            Self::ComposerDag => "COMPOSER_DAG",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown object type: {wanted}"))
    }
}
