//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for lineage using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `check`: Load and validate the cache, report counts and dependency cycles
//! - `show`: Show object details
//! - `forward`: Downstream lineage of an object
//! - `backward`: Upstream lineage of an object
//! - `full`: Upstream and downstream lineage of an object
//! - `search`: Find objects by name, schema or ID
//! - `list`: Page through objects
//! - `schemas`, `types`: Distinct schema names and object types
//! - `stats`: Cache statistics
//! - `columns`: Column-level lineage
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--cache <path>`: Cache artifact to load (`.json` or `.jsonl`)
//! - `--config <path>`: Configuration file (default `./lineage.yaml` if present)
//!
//! # Example
//!
//! ```bash
//! lineage --cache data/lineage_cache.json check
//! lineage forward DWH.FACT_SALES --depth 3
//! lineage full STAGE.ORDERS --upstream 1 --downstream 4 --json
//! lineage search orders --type VIEW
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Re-export argument structs
pub use args::{
    CheckArgs, ColumnsArgs, FullArgs, LineageArgs, ListArgs, SearchArgs, ShowArgs,
};

// Re-export types
pub use types::{ColumnDirectionArg, ObjectTypeArg};

// Re-export validators for external use
pub use validators::{validate_column, validate_object_id, validate_query};

/// Lineage - explore database object lineage from a pre-computed cache
///
/// Loads the dependency cache produced by the lineage extractors and answers
/// upstream/downstream questions about tables, views, UDFs and friends.
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Cache artifact to load (overrides config and LINEAGE_CACHE_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load and validate the cache
    ///
    /// Prints object and dependency counts, the artifact checksum and any
    /// dependency cycles.
    Check(CheckArgs),

    /// Show detailed information about an object
    Show(ShowArgs),

    /// Show downstream lineage (objects that consume this one)
    Forward(LineageArgs),

    /// Show upstream lineage (objects this one is built from)
    Backward(LineageArgs),

    /// Show upstream and downstream lineage together
    Full(FullArgs),

    /// Search objects by name, schema or ID
    Search(SearchArgs),

    /// List objects one page at a time, sorted by ID
    List(ListArgs),

    /// List distinct schema names
    Schemas,

    /// List object types present in the cache
    Types,

    /// Show cache statistics
    Stats,

    /// Show column-level lineage
    Columns(ColumnsArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Fails if the cache cannot be loaded or the command itself fails.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Lineage graph explorer");
            println!("Use --help for more information");
            return Ok(());
        };

        let app = App::from_options(self.cache.as_deref(), self.config.as_deref()).await?;

        match command {
            Commands::Check(args) => execute::execute_check(&app, args, output_mode),
            Commands::Show(args) => execute::execute_show(&app, args, output_mode),
            Commands::Forward(args) => execute::execute_forward(&app, args, output_mode),
            Commands::Backward(args) => execute::execute_backward(&app, args, output_mode),
            Commands::Full(args) => execute::execute_full(&app, args, output_mode),
            Commands::Search(args) => execute::execute_search(&app, args, output_mode),
            Commands::List(args) => execute::execute_list(&app, args, output_mode),
            Commands::Schemas => execute::execute_schemas(&app, output_mode),
            Commands::Types => execute::execute_types(&app, output_mode),
            Commands::Stats => execute::execute_stats(&app, output_mode),
            Commands::Columns(args) => execute::execute_columns(&app, args, output_mode),
        }
    }
}
