//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::types::{ColumnDirectionArg, ObjectTypeArg};
use super::validators::{validate_column, validate_object_id, validate_query};
use crate::catalog::{MAX_PAGE_SIZE, MAX_SEARCH_LIMIT};

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Skip the dependency cycle scan
    #[arg(long)]
    pub no_cycles: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Object ID (e.g., DWH.FACT_SALES)
    #[arg(value_parser = validate_object_id)]
    pub id: String,
}

/// Arguments for the `forward` and `backward` commands
#[derive(Parser, Debug, Clone)]
pub struct LineageArgs {
    /// Object ID to start from
    #[arg(value_parser = validate_object_id)]
    pub id: String,

    /// Number of hops to expand (clamped to 0..=10, default from config)
    #[arg(short, long, allow_negative_numbers = true)]
    pub depth: Option<i64>,
}

/// Arguments for the `full` command
#[derive(Parser, Debug, Clone)]
pub struct FullArgs {
    /// Object ID to start from
    #[arg(value_parser = validate_object_id)]
    pub id: String,

    /// Hops to expand upstream (clamped to 0..=10, default from config)
    #[arg(short, long, allow_negative_numbers = true)]
    pub upstream: Option<i64>,

    /// Hops to expand downstream (clamped to 0..=10, default from config)
    #[arg(short, long, allow_negative_numbers = true)]
    pub downstream: Option<i64>,
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Case-insensitive text matched against name, schema and ID
    #[arg(value_parser = validate_query)]
    pub query: String,

    /// Maximum number of results
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=MAX_SEARCH_LIMIT as i64))]
    pub limit: Option<u16>,

    /// Only objects in this schema
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Only objects of this type
    #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
    pub object_type: Option<ObjectTypeArg>,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// 1-based page number
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Objects per page
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=MAX_PAGE_SIZE as i64))]
    pub page_size: Option<u16>,

    /// Only objects in this schema
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Only objects of this type
    #[arg(short = 't', long = "type", value_enum, ignore_case = true)]
    pub object_type: Option<ObjectTypeArg>,
}

/// Arguments for the `columns` command
#[derive(Parser, Debug, Clone)]
pub struct ColumnsArgs {
    /// Object ID whose columns to trace
    #[arg(value_parser = validate_object_id)]
    pub id: String,

    /// Trace a single column (default: every column with lineage)
    #[arg(short, long, value_parser = validate_column)]
    pub column: Option<String>,

    /// Which side of the column to follow
    #[arg(long, value_enum, default_value_t = ColumnDirectionArg::Both)]
    pub direction: ColumnDirectionArg,

    /// Number of hops to follow (clamped to 0..=10)
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    pub depth: i64,
}
