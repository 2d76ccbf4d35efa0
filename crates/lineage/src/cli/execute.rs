//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Every command
//! works against the snapshot published when the app was built.

use anyhow::Result;

use super::args::{CheckArgs, ColumnsArgs, FullArgs, LineageArgs, ListArgs, SearchArgs, ShowArgs};
use crate::analysis;
use crate::app::App;
use crate::catalog::ObjectFilter;
use crate::domain::ObjectType;
use crate::engine::Depth;
use crate::index::Direction;
use crate::output::{self, CheckReport, ObjectReport, OutputMode};

/// Execute the check command
pub fn execute_check(app: &App, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let cycles = if args.no_cycles {
        Vec::new()
    } else {
        analysis::dependency_cycles(&snapshot)
    };

    if !cycles.is_empty() {
        tracing::warn!(cycles = cycles.len(), "Dependency cycles present in cache");
    }

    let report = CheckReport {
        generation: app.service().generation(),
        load: snapshot.metadata(),
        cycles,
    };
    output::print_check(&report, output_mode)?;
    Ok(())
}

/// Execute the show command
pub fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let object = snapshot.get_object(&args.id)?;

    let (upstream_count, downstream_count) = snapshot
        .store()
        .node_id(&args.id)
        .map(|node| {
            let index = snapshot.index();
            (
                index.degree(node, Direction::Backward),
                index.degree(node, Direction::Forward),
            )
        })
        .unwrap_or_default();

    let report = ObjectReport {
        object,
        upstream_count,
        downstream_count,
        columns_with_lineage: snapshot.columns().columns_with_lineage(&args.id),
    };
    output::print_object(&report, output_mode)?;
    Ok(())
}

/// Execute the forward command
pub fn execute_forward(app: &App, args: &LineageArgs, output_mode: OutputMode) -> Result<()> {
    execute_directional(app, args, Direction::Forward, output_mode)
}

/// Execute the backward command
pub fn execute_backward(app: &App, args: &LineageArgs, output_mode: OutputMode) -> Result<()> {
    execute_directional(app, args, Direction::Backward, output_mode)
}

fn execute_directional(
    app: &App,
    args: &LineageArgs,
    direction: Direction,
    output_mode: OutputMode,
) -> Result<()> {
    let snapshot = app.snapshot()?;
    let depth = depth_or_default(app, args.depth);
    let lineage = app.engine(&snapshot).directional(&args.id, direction, depth)?;
    output::print_directional(&lineage, output_mode)?;
    Ok(())
}

/// Execute the full command
pub fn execute_full(app: &App, args: &FullArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let lineage = app.engine(&snapshot).full(
        &args.id,
        depth_or_default(app, args.upstream),
        depth_or_default(app, args.downstream),
    )?;
    output::print_full(&lineage, output_mode)?;
    Ok(())
}

/// Execute the search command
pub fn execute_search(app: &App, args: &SearchArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let filter = ObjectFilter {
        schema: args.schema.clone(),
        object_type: args.object_type.map(ObjectType::from),
    };
    let hits = snapshot
        .catalog()
        .search(&args.query, args.limit.map(usize::from), &filter);
    output::print_objects(&hits, output_mode)?;
    Ok(())
}

/// Execute the list command
pub fn execute_list(app: &App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let filter = ObjectFilter {
        schema: args.schema.clone(),
        object_type: args.object_type.map(ObjectType::from),
    };
    let page = snapshot.catalog().list(
        args.page as usize,
        args.page_size.map(usize::from),
        &filter,
    );
    output::print_page(&page, output_mode)?;
    Ok(())
}

/// Execute the schemas command
pub fn execute_schemas(app: &App, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    output::print_names("Schemas", &snapshot.catalog().schemas(), output_mode)?;
    Ok(())
}

/// Execute the types command
pub fn execute_types(app: &App, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let types = snapshot.catalog().types();
    output::print_names("Object types", &output::type_names(&types), output_mode)?;
    Ok(())
}

/// Execute the stats command
pub fn execute_stats(app: &App, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    output::print_statistics(&snapshot.catalog().statistics(), output_mode)?;
    Ok(())
}

/// Execute the columns command
///
/// With `--column`, traces that column. Without it, traces every column of
/// the object that appears in column lineage.
pub fn execute_columns(app: &App, args: &ColumnsArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.snapshot()?;
    let depth = Depth::new(args.depth);
    let direction = args.direction.into();

    let results = match &args.column {
        Some(column) => vec![snapshot.column_lineage(&args.id, column, direction, depth)?],
        None => {
            snapshot.get_object(&args.id)?;
            snapshot
                .columns()
                .columns_with_lineage(&args.id)
                .into_iter()
                .map(|column| snapshot.column_lineage(&args.id, column, direction, depth))
                .collect::<crate::error::Result<Vec<_>>>()?
        }
    };

    output::print_column_lineage(&results, output_mode)?;
    Ok(())
}

fn depth_or_default(app: &App, requested: Option<i64>) -> Depth {
    requested.map_or_else(|| app.default_depth(), Depth::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineageConfig;
    use crate::service::{LineageService, MemorySource};
    use lineage_cache::CacheFormat;

    const CACHE: &str = r#"{
        "objects": {
            "S.A": {"id": "S.A", "schema": "S", "name": "A", "type": "TABLE"},
            "S.B": {"id": "S.B", "schema": "S", "name": "B", "type": "VIEW"}
        },
        "dependencies": [
            {"source_id": "S.A", "target_id": "S.B", "dependency_type": "VIEW", "reference_type": "SELECT"},
            {"source_id": "S.B", "target_id": "S.A", "dependency_type": "ETL", "reference_type": "INSERT_SELECT"}
        ]
    }"#;

    async fn app() -> App {
        let service = LineageService::new(MemorySource::new("test", CacheFormat::Json, CACHE));
        service.reload().await.unwrap();
        App::with_service(service, LineageConfig::default())
    }

    #[tokio::test]
    async fn depth_falls_back_to_config() {
        let app = app().await;
        assert_eq!(depth_or_default(&app, None), Depth::DEFAULT);
        assert_eq!(depth_or_default(&app, Some(-3)).get(), 0);
        assert_eq!(depth_or_default(&app, Some(50)), Depth::MAX);
    }

    #[tokio::test]
    async fn commands_run_against_published_snapshot() {
        let app = app().await;
        let json = OutputMode::Json;

        execute_check(&app, &CheckArgs::default(), json).unwrap();
        execute_show(&app, &ShowArgs { id: "S.A".into() }, json).unwrap();
        execute_forward(&app, &LineageArgs { id: "S.A".into(), depth: Some(2) }, json).unwrap();
        execute_stats(&app, json).unwrap();
    }

    #[tokio::test]
    async fn unknown_object_is_an_error() {
        let app = app().await;
        let err = execute_show(&app, &ShowArgs { id: "DOES.NOTEXIST".into() }, OutputMode::Json)
            .unwrap_err();
        assert!(err.to_string().contains("DOES.NOTEXIST"));
    }
}
