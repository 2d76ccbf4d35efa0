//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, type glyphs)
//! - [`tree`]: Lineage tree rendering with ASCII/Unicode connectors

pub mod color;
pub mod tree;

use crate::catalog::{Page, Statistics};
use crate::columns::ColumnLineage;
use crate::domain::{DatabaseObject, ObjectDetails, ObjectId, ObjectType};
use crate::engine::{DirectionalLineage, FullLineage};
use crate::index::Direction;
use crate::loader::LoadMetadata;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};
pub use tree::{build_lineage_tree, write_lineage_tree, LineageTreeNode};

use color::{bold, colorize_id, colorize_type, cyan, dimmed, type_icon};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only glyphs instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `LINEAGE_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `LINEAGE_ASCII`: Set to "1" or "true" for ASCII-only glyphs (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `LINEAGE_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`OutputConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match lookup("LINEAGE_MAX_WIDTH") {
            Some(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "LINEAGE_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("LINEAGE_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "LINEAGE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // NO_COLOR (https://no-color.org/) wins over LINEAGE_COLOR
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("LINEAGE_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| usize::from(w.0))
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Report Types
// ============================================================================

/// Object details plus its immediate neighborhood, for `show`.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectReport<'s> {
    /// The object
    pub object: &'s DatabaseObject,
    /// Number of direct providers
    pub upstream_count: usize,
    /// Number of direct consumers
    pub downstream_count: usize,
    /// Columns that appear in column lineage, sorted
    pub columns_with_lineage: Vec<&'s str>,
}

/// Result of `check`: how the cache loaded and what loops it contains.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport<'s> {
    /// Published generation number
    pub generation: u64,
    /// Load facts
    pub load: &'s LoadMetadata,
    /// Dependency cycles, each sorted by id
    pub cycles: Vec<Vec<&'s ObjectId>>,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Write `value` to stdout, as text via `text` or as pretty JSON.
fn emit<T, F>(mode: OutputMode, value: &T, text: F) -> io::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut io::StdoutLock<'static>, &OutputConfig) -> io::Result<()>,
{
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Text => text(&mut out, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut out, value),
    }
}

/// Print object details in the specified format
pub fn print_object(report: &ObjectReport<'_>, mode: OutputMode) -> io::Result<()> {
    emit(mode, report, |w, config| print_object_text(w, report, config))
}

/// Print a forward or backward lineage result
pub fn print_directional(lineage: &DirectionalLineage<'_>, mode: OutputMode) -> io::Result<()> {
    emit(mode, lineage, |w, config| print_directional_text(w, lineage, config))
}

/// Print a combined upstream and downstream lineage result
pub fn print_full(lineage: &FullLineage<'_>, mode: OutputMode) -> io::Result<()> {
    emit(mode, lineage, |w, config| print_full_text(w, lineage, config))
}

/// Print search hits
pub fn print_objects(objects: &[&DatabaseObject], mode: OutputMode) -> io::Result<()> {
    emit(mode, objects, |w, config| print_objects_text(w, objects, config))
}

/// Print one page of a listing
pub fn print_page(page: &Page<'_>, mode: OutputMode) -> io::Result<()> {
    emit(mode, page, |w, config| print_page_text(w, page, config))
}

/// Print a flat list of names (schemas or types)
pub fn print_names<T: AsRef<str> + Serialize>(
    title: &str,
    names: &[T],
    mode: OutputMode,
) -> io::Result<()> {
    emit(mode, names, |w, config| {
        writeln!(w, "{} ({}):", bold(title, config), names.len())?;
        for name in names {
            writeln!(w, "  {}", name.as_ref())?;
        }
        Ok(())
    })
}

/// Print catalog statistics
pub fn print_statistics(stats: &Statistics, mode: OutputMode) -> io::Result<()> {
    emit(mode, stats, |w, config| print_statistics_text(w, stats, config))
}

/// Print column lineage results, one per column
pub fn print_column_lineage(results: &[ColumnLineage<'_>], mode: OutputMode) -> io::Result<()> {
    emit(mode, results, |w, config| print_column_lineage_text(w, results, config))
}

/// Print the cache check report
pub fn print_check(report: &CheckReport<'_>, mode: OutputMode) -> io::Result<()> {
    emit(mode, report, |w, config| print_check_text(w, report, config))
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn object_line(object: &DatabaseObject, config: &OutputConfig) -> String {
    format!(
        "{} {}  {}",
        type_icon(object.object_type(), config),
        colorize_id(object.id.as_str(), config),
        colorize_type(object.object_type(), config)
    )
}

fn print_object_text<W: Write>(
    w: &mut W,
    report: &ObjectReport<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let object = report.object;
    let content_width = get_terminal_width().min(config.max_width);

    writeln!(w, "{}", object_line(object, config))?;
    writeln!(
        w,
        "{} {}    {} {}    {} {}",
        dimmed("Schema:", config),
        object.schema,
        dimmed("Name:", config),
        object.name,
        dimmed("Owner:", config),
        if object.owner.is_empty() { "-" } else { object.owner.as_str() }
    )?;
    if let Some(platform) = object.platform {
        writeln!(w, "{} {platform:?}", dimmed("Platform:", config))?;
    }
    if object.created_at.is_some() || object.modified_at.is_some() {
        let stamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
            t.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
        };
        writeln!(
            w,
            "{} {}    {} {}",
            dimmed("Created:", config),
            stamp(object.created_at),
            dimmed("Modified:", config),
            stamp(object.modified_at)
        )?;
    }
    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Upstream:", config),
        report.upstream_count,
        dimmed("Downstream:", config),
        report.downstream_count
    )?;

    if let Some(description) = &object.description {
        print_text_section(w, "Description", description, content_width, config)?;
    }

    match &object.details {
        ObjectDetails::Table(table) | ObjectDetails::BigqueryTable(table) => {
            if let Some(rows) = table.row_count {
                writeln!(w, "{} {rows}", dimmed("Rows:", config))?;
            }
            if let Some(bytes) = table.size_bytes {
                writeln!(w, "{} {bytes}", dimmed("Size (bytes):", config))?;
            }
        }
        ObjectDetails::View(view) | ObjectDetails::BigqueryView(view) => {
            if let Some(definition) = &view.definition {
                print_text_section(w, "Definition", definition, content_width, config)?;
            }
        }
        ObjectDetails::LuaUdf(udf)
        | ObjectDetails::BigqueryUdf(udf)
        | ObjectDetails::BigqueryProcedure(udf) => {
            if let Some(kind) = &udf.udf_type {
                writeln!(w, "{} {kind}", dimmed("UDF type:", config))?;
            }
            if let Some(language) = &udf.script_language {
                writeln!(w, "{} {language}", dimmed("Language:", config))?;
            }
            print_parameters(w, "Input parameters", &udf.input_parameters, config)?;
            print_parameters(w, "Output columns", &udf.output_columns, config)?;
        }
        ObjectDetails::VirtualSchema(vs) => {
            for (label, value) in [
                ("Adapter:", &vs.adapter_name),
                ("Connection:", &vs.connection_name),
                ("Remote schema:", &vs.remote_schema),
            ] {
                if let Some(value) = value {
                    writeln!(w, "{} {value}", dimmed(label, config))?;
                }
            }
        }
        ObjectDetails::Connection(connection) => {
            if let Some(target) = &connection.connection_string {
                writeln!(w, "{} {target}", dimmed("Connects to:", config))?;
            }
        }
        ObjectDetails::ComposerDag(dag) => {
            if let Some(schedule) = &dag.schedule {
                writeln!(w, "{} {schedule}", dimmed("Schedule:", config))?;
            }
        }
    }

    let columns = object.columns();
    if !columns.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Columns", config), columns.len())?;
        for column in columns {
            let lineage = if report.columns_with_lineage.contains(&column.name.as_str()) {
                format!(" {}", cyan("⇄", config))
            } else {
                String::new()
            };
            let key = if column.is_primary_key { " PK" } else { "" };
            let nullable = if column.is_nullable { "" } else { " NOT NULL" };
            writeln!(
                w,
                "  {} {}{}{}{}",
                column.name,
                dimmed(&column.data_type, config),
                key,
                nullable,
                lineage
            )?;
        }
    }

    Ok(())
}

fn print_parameters<W: Write>(
    w: &mut W,
    title: &str,
    parameters: &[crate::domain::Parameter],
    config: &OutputConfig,
) -> io::Result<()> {
    if parameters.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{} ({}):", bold(title, config), parameters.len())?;
    for parameter in parameters {
        writeln!(w, "  {} {}", parameter.name, dimmed(&parameter.data_type, config))?;
    }
    Ok(())
}

fn print_directional_text<W: Write>(
    w: &mut W,
    lineage: &DirectionalLineage<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let Some(root) = lineage.nodes.first() else {
        return Ok(());
    };
    let title = match lineage.direction {
        Direction::Forward => "Downstream",
        Direction::Backward => "Upstream",
    };
    writeln!(
        w,
        "{} of {} (depth {}, {} objects, {} edges)",
        bold(title, config),
        colorize_id(lineage.root.as_str(), config),
        lineage.depth.get(),
        lineage.nodes.len(),
        lineage.edges.len()
    )?;
    writeln!(w)?;

    let tree = build_lineage_tree(
        root,
        &lineage.nodes,
        &lineage.edges,
        lineage.direction,
        &lineage.has_more,
    );
    write_lineage_tree(w, &tree, config)?;

    if lineage.truncated {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            warning("Result truncated at the node limit; narrow the depth to see more.", config)
        )?;
    }
    Ok(())
}

fn print_full_text<W: Write>(
    w: &mut W,
    lineage: &FullLineage<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let root = lineage.root_object;
    writeln!(
        w,
        "{} of {} ({} objects, {} edges)",
        bold("Lineage", config),
        colorize_id(root.id.as_str(), config),
        lineage.nodes.len(),
        lineage.edges.len()
    )?;

    for (title, direction, has_more) in [
        ("Upstream", Direction::Backward, &lineage.has_more_upstream),
        ("Downstream", Direction::Forward, &lineage.has_more_downstream),
    ] {
        // Each side only shows the nodes its own expansion produced.
        let side: Vec<&DatabaseObject> = lineage
            .nodes
            .iter()
            .copied()
            .filter(|object| has_more.contains_key(object.id.as_str()))
            .collect();
        writeln!(w)?;
        writeln!(w, "{}:", bold(title, config))?;
        let tree = build_lineage_tree(root, &side, &lineage.edges, direction, has_more);
        write_lineage_tree(w, &tree, config)?;
    }

    if lineage.truncated() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            warning("Result truncated at the node limit; narrow the depth to see more.", config)
        )?;
    }
    Ok(())
}

fn print_objects_text<W: Write>(
    w: &mut W,
    objects: &[&DatabaseObject],
    config: &OutputConfig,
) -> io::Result<()> {
    if objects.is_empty() {
        writeln!(w, "No objects found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} object(s):", objects.len())?;
    writeln!(w)?;
    for object in objects {
        writeln!(w, "{}", object_line(object, config))?;
    }
    Ok(())
}

fn print_page_text<W: Write>(w: &mut W, page: &Page<'_>, config: &OutputConfig) -> io::Result<()> {
    if page.items.is_empty() {
        writeln!(
            w,
            "No objects on page {} ({} total).",
            page.page, page.total
        )?;
        return Ok(());
    }

    writeln!(
        w,
        "Page {}/{} ({} objects total):",
        page.page, page.total_pages, page.total
    )?;
    writeln!(w)?;
    for object in &page.items {
        writeln!(w, "{}", object_line(object, config))?;
    }
    Ok(())
}

fn print_statistics_text<W: Write>(
    w: &mut W,
    stats: &Statistics,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Lineage cache statistics", config))?;
    writeln!(w)?;
    let rows = [
        ("Objects", stats.total_objects),
        ("Dependencies", stats.total_dependencies),
        ("Column dependencies", stats.total_column_dependencies),
        ("Objects with column lineage", stats.objects_with_column_lineage),
        ("Schemas", stats.schemas),
    ];
    for (label, value) in rows {
        writeln!(w, "  {:<28} {value}", dimmed(label, config))?;
    }

    if !stats.by_type.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("By type", config))?;
        for (object_type, count) in &stats.by_type {
            writeln!(w, "  {:<28} {count}", colorize_type(*object_type, config))?;
        }
    }

    writeln!(w)?;
    writeln!(
        w,
        "{} {}",
        dimmed("Loaded:", config),
        stats.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn print_column_lineage_text<W: Write>(
    w: &mut W,
    results: &[ColumnLineage<'_>],
    config: &OutputConfig,
) -> io::Result<()> {
    if results.is_empty() {
        writeln!(w, "No column lineage found.")?;
        return Ok(());
    }

    for (i, lineage) in results.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "{}", colorize_id(&lineage.column.to_string(), config))?;
        if lineage.sources.is_empty() && lineage.targets.is_empty() {
            writeln!(w, "  {}", dimmed("no lineage", config))?;
            continue;
        }
        for source in &lineage.sources {
            let transformation = source
                .transformation
                .map(|t| format!(" = {t}"))
                .unwrap_or_default();
            writeln!(
                w,
                "  {} {}.{} {}{}",
                cyan("←", config),
                source.object_id,
                source.column,
                dimmed(&format!("[{}]", source.transformation_type), config),
                transformation
            )?;
        }
        for target in &lineage.targets {
            writeln!(
                w,
                "  {} {}.{}",
                cyan("→", config),
                target.object_id,
                target.column
            )?;
        }
    }
    Ok(())
}

fn print_check_text<W: Write>(
    w: &mut W,
    report: &CheckReport<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let load = report.load;
    writeln!(
        w,
        "{} {} ({})",
        success("Loaded", config),
        load.origin,
        load.format
    )?;
    writeln!(w, "  {} {}", dimmed("Generation:", config), report.generation)?;
    writeln!(w, "  {} {}", dimmed("Checksum:", config), load.checksum)?;
    if let Some(version) = &load.cache.version {
        writeln!(w, "  {} {version}", dimmed("Cache version:", config))?;
    }
    if let Some(generated_at) = load.cache.generated_at {
        writeln!(
            w,
            "  {} {}",
            dimmed("Generated:", config),
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    }
    writeln!(
        w,
        "  {} {}    {} {}    {} {}",
        dimmed("Objects:", config),
        load.object_count,
        dimmed("Dependencies:", config),
        load.dependency_count,
        dimmed("Column dependencies:", config),
        load.column_dependency_count
    )?;

    writeln!(w)?;
    if report.cycles.is_empty() {
        writeln!(w, "{}", success("No dependency cycles.", config))?;
        return Ok(());
    }

    writeln!(
        w,
        "{}",
        error(
            &format!("Found {} dependency cycle(s):", report.cycles.len()),
            config
        )
    )?;
    for cycle in &report.cycles {
        let members: Vec<String> = cycle
            .iter()
            .map(|id| colorize_id(id.as_str(), config))
            .collect();
        writeln!(w, "  {}", members.join(dimmed(" ⇄ ", config).as_str()))?;
    }
    Ok(())
}

// ============================================================================
// Section Printing Helpers
// ============================================================================

/// Print a text section with a bold title and wrapped, indented content.
fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for line in wrap_text(content, width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long identifiers.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

/// Wire names of `types`, for [`print_names`].
#[must_use]
pub fn type_names(types: &[ObjectType]) -> Vec<&'static str> {
    types.iter().map(|t| t.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, TableDetails, ViewDetails};
    use crate::store::tests::object;
    use std::collections::HashMap;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, false, false)
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("one two three four five", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn test_wrap_text_preserves_newlines() {
        let wrapped = wrap_text("SELECT *\n\nFROM t", 80);
        assert_eq!(wrapped, vec!["SELECT *", "", "FROM t"]);
    }

    #[test]
    fn test_output_config_from_lookup() {
        let env = HashMap::from([("LINEAGE_MAX_WIDTH", "120"), ("LINEAGE_ASCII", "1")]);
        let config = OutputConfig::from_lookup(|k| env.get(k).map(|v| (*v).to_string()));
        assert_eq!(config.max_width, 120);
        assert!(config.use_ascii);
        assert!(config.use_colors);

        let env = HashMap::from([("LINEAGE_MAX_WIDTH", "invalid"), ("LINEAGE_ASCII", "false")]);
        let config = OutputConfig::from_lookup(|k| env.get(k).map(|v| (*v).to_string()));
        assert_eq!(config.max_width, DEFAULT_MAX_CONTENT_WIDTH);
        assert!(!config.use_ascii);
    }

    #[test]
    fn test_color_switches() {
        let config = OutputConfig::from_lookup(|k| (k == "NO_COLOR").then(|| "1".to_string()));
        assert!(!config.use_colors, "NO_COLOR should disable colors");

        for value in ["0", "false", "FALSE"] {
            let config =
                OutputConfig::from_lookup(|k| (k == "LINEAGE_COLOR").then(|| value.to_string()));
            assert!(!config.use_colors, "LINEAGE_COLOR={value} should disable colors");
        }

        assert_eq!(OutputConfig::from_lookup(|_| None), OutputConfig::default());
    }

    #[test]
    fn test_print_object_text_lists_columns() {
        let mut table = object("DWH.FACT", false);
        table.details = ObjectDetails::Table(TableDetails {
            columns: vec![Column {
                name: "AMOUNT".to_string(),
                data_type: "DECIMAL(18,2)".to_string(),
                ordinal_position: Some(1),
                is_nullable: false,
                is_primary_key: false,
                description: None,
            }],
            row_count: Some(42),
            size_bytes: None,
        });
        let report = ObjectReport {
            object: &table,
            upstream_count: 2,
            downstream_count: 0,
            columns_with_lineage: vec!["AMOUNT"],
        };

        let output = render(|w| print_object_text(w, &report, &plain()));
        assert!(output.contains("DWH.FACT"));
        assert!(output.contains("Upstream: 2"));
        assert!(output.contains("Rows: 42"));
        assert!(output.contains("AMOUNT DECIMAL(18,2) NOT NULL ⇄"));
    }

    #[test]
    fn test_print_object_text_view_definition() {
        let mut view = object("DWH.V", true);
        view.details = ObjectDetails::View(ViewDetails {
            definition: Some("SELECT 1".to_string()),
            columns: Vec::new(),
        });
        let report = ObjectReport {
            object: &view,
            upstream_count: 0,
            downstream_count: 0,
            columns_with_lineage: Vec::new(),
        };

        let output = render(|w| print_object_text(w, &report, &plain()));
        assert!(output.contains("Definition:"));
        assert!(output.contains("  SELECT 1"));
    }

    #[test]
    fn test_print_objects_text_empty() {
        let output = render(|w| print_objects_text(w, &[], &plain()));
        assert_eq!(output, "No objects found.\n");
    }

    #[test]
    fn test_write_json_round_trips() {
        let table = object("S.T", false);
        let output = render(|w| write_json(w, &[&table]));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["id"], "S.T");
        assert_eq!(parsed[0]["type"], "TABLE");
    }
}
