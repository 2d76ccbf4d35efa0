//! CLI value enums and domain type conversions.
//!
//! This module contains the value enums used for CLI argument parsing
//! and their conversions to domain types.

use clap::ValueEnum;

use crate::columns::ColumnDirection;
use crate::domain::ObjectType;

// ============================================================================
// Value Enums
// ============================================================================

/// Object type for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectTypeArg {
    /// Exasol table
    #[value(alias = "table")]
    Table,
    /// Exasol view
    #[value(alias = "view")]
    View,
    /// Exasol Lua UDF
    #[value(alias = "lua_udf", alias = "udf")]
    LuaUdf,
    /// Exasol virtual schema
    #[value(alias = "virtual_schema")]
    VirtualSchema,
    /// Exasol connection
    #[value(alias = "connection")]
    Connection,
    /// BigQuery table
    #[value(alias = "bigquery_table")]
    BigqueryTable,
    /// BigQuery view
    #[value(alias = "bigquery_view")]
    BigqueryView,
    /// BigQuery UDF
    #[value(alias = "bigquery_udf")]
    BigqueryUdf,
    /// BigQuery procedure
    #[value(alias = "bigquery_procedure")]
    BigqueryProcedure,
    /// Composer DAG
    #[value(alias = "composer_dag")]
    ComposerDag,
}

impl std::fmt::Display for ObjectTypeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ObjectType::from(*self))
    }
}

impl From<ObjectTypeArg> for ObjectType {
    fn from(arg: ObjectTypeArg) -> Self {
        match arg {
            ObjectTypeArg::Table => ObjectType::Table,
            ObjectTypeArg::View => ObjectType::View,
            ObjectTypeArg::LuaUdf => ObjectType::LuaUdf,
            ObjectTypeArg::VirtualSchema => ObjectType::VirtualSchema,
            ObjectTypeArg::Connection => ObjectType::Connection,
            ObjectTypeArg::BigqueryTable => ObjectType::BigqueryTable,
            ObjectTypeArg::BigqueryView => ObjectType::BigqueryView,
            ObjectTypeArg::BigqueryUdf => ObjectType::BigqueryUdf,
            ObjectTypeArg::BigqueryProcedure => ObjectType::BigqueryProcedure,
            ObjectTypeArg::ComposerDag => ObjectType::ComposerDag,
        }
    }
}

/// Column lineage direction for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnDirectionArg {
    /// Columns the column is computed from
    Upstream,
    /// Columns computed from the column
    Downstream,
    /// Both sides
    #[default]
    Both,
}

impl std::fmt::Display for ColumnDirectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ColumnDirection::from(*self))
    }
}

impl From<ColumnDirectionArg> for ColumnDirection {
    fn from(arg: ColumnDirectionArg) -> Self {
        match arg {
            ColumnDirectionArg::Upstream => ColumnDirection::Upstream,
            ColumnDirectionArg::Downstream => ColumnDirection::Downstream,
            ColumnDirectionArg::Both => ColumnDirection::Both,
        }
    }
}
