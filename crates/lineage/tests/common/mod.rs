//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use lineage::loader;
use lineage::snapshot::Snapshot;
use lineage_cache::{CacheFormat, RawArtifact};
use serde_json::{json, Value};

/// A cache object record; names starting with `V` become views, the rest tables.
pub fn object(id: &str) -> Value {
    let (schema, name) = id.split_once('.').unwrap_or(("S", id));
    let object_type = if name.starts_with('V') { "VIEW" } else { "TABLE" };
    json!({
        "id": id,
        "schema": schema,
        "name": name,
        "type": object_type,
        "owner": "ETL_USER",
        "object_id": 1,
    })
}

/// A table-level edge.
pub fn edge(from: &str, to: &str, dependency_type: &str, reference_type: &str) -> Value {
    json!({
        "source_id": from,
        "target_id": to,
        "dependency_type": dependency_type,
        "reference_type": reference_type,
    })
}

/// A `VIEW`/`SELECT` edge.
pub fn view_edge(from: &str, to: &str) -> Value {
    edge(from, to, "VIEW", "SELECT")
}

/// JSON document with an object map and split dependency sections.
pub fn document(objects: &[Value], edges: &[Value]) -> String {
    let map: serde_json::Map<String, Value> = objects
        .iter()
        .map(|o| (o["id"].as_str().unwrap().to_string(), o.clone()))
        .collect();
    json!({
        "metadata": {"version": "2.0", "generated_at": "2024-03-01T06:00:00Z"},
        "objects": map,
        "dependencies": {"table_level": edges, "column_level": []},
    })
    .to_string()
}

/// JSON document for `ids` wired by `VIEW`/`SELECT` edges.
pub fn graph_document(ids: &[&str], edges: &[(&str, &str)]) -> String {
    let objects: Vec<Value> = ids.iter().map(|id| object(id)).collect();
    let edges: Vec<Value> = edges.iter().map(|(a, b)| view_edge(a, b)).collect();
    document(&objects, &edges)
}

/// Load a JSON document.
pub async fn load(text: &str) -> lineage::error::Result<Snapshot> {
    let artifact = RawArtifact::from_bytes(CacheFormat::Json, text.as_bytes().to_vec());
    loader::load_snapshot(artifact, "test").await
}

/// Load a graph of `VIEW`/`SELECT` edges.
pub async fn graph(ids: &[&str], edges: &[(&str, &str)]) -> Snapshot {
    load(&graph_document(ids, edges)).await.unwrap()
}

/// Scenario chain: A -> B (VIEW/SELECT), B -> C (ETL/INSERT_SELECT).
pub async fn abc() -> Snapshot {
    let text = document(
        &[object("S.A"), object("S.B"), object("S.C")],
        &[
            edge("S.A", "S.B", "VIEW", "SELECT"),
            edge("S.B", "S.C", "ETL", "INSERT_SELECT"),
        ],
    );
    load(&text).await.unwrap()
}
