//! Cache loader: raw artifact to validated [`Snapshot`].
//!
//! Loading is all-or-nothing. The artifact is decoded, every object is
//! placed in a fresh [`ObjectStore`], and both edge lists are resolved
//! against it. The first integrity problem aborts the load and nothing is
//! produced, so whatever generation is currently published keeps serving.
//!
//! Two encodings are accepted, chosen by [`CacheFormat`]:
//!
//! - a JSON document with `metadata`, `objects` and `dependencies` sections
//! - JSON Lines, one record per line, tagged by `"record"`

mod wire;

pub use wire::CacheMetadata;

use crate::columns::ColumnLineageIndex;
use crate::domain::{ColumnLevelDependency, DatabaseObject, TableLevelDependency};
use crate::error::{LoadError, Result};
use crate::index::DependencyIndex;
use crate::snapshot::Snapshot;
use crate::store::ObjectStore;
use chrono::{DateTime, Utc};
use lineage_cache::{decode_document, decode_lines, read_artifact, CacheFormat, RawArtifact};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use wire::{CacheDocument, CacheRecord};

/// Facts about how and when a generation was loaded.
#[derive(Debug, Clone, Serialize)]
pub struct LoadMetadata {
    /// Header recorded by the extractor (empty if the artifact had none)
    pub cache: CacheMetadata,
    /// When this process finished building the generation
    pub loaded_at: DateTime<Utc>,
    /// Lower-case hex SHA-256 of the raw artifact
    pub checksum: String,
    /// Where the artifact came from
    pub origin: String,
    /// Encoding of the artifact (`json` or `jsonl`)
    pub format: String,
    /// Number of objects
    pub object_count: usize,
    /// Number of table-level dependencies
    pub dependency_count: usize,
    /// Number of column-level dependencies
    pub column_dependency_count: usize,
}

/// Decoded but not yet validated cache content.
#[derive(Debug, Default)]
struct CacheContent {
    metadata: Option<CacheMetadata>,
    objects: Vec<DatabaseObject>,
    dependencies: Vec<TableLevelDependency>,
    column_dependencies: Vec<ColumnLevelDependency>,
}

/// Build a snapshot from a raw artifact.
///
/// # Errors
///
/// Returns [`crate::error::Error::Cache`] if the artifact cannot be decoded
/// and [`crate::error::Error::Load`] if it is structurally invalid: no
/// objects, a missing section, a duplicate id, or an edge or column
/// dependency naming an unknown object.
pub async fn load_snapshot(artifact: RawArtifact, origin: impl Into<String>) -> Result<Snapshot> {
    let started = Instant::now();
    let origin = origin.into();
    let content = decode(&artifact).await?;

    if content.objects.is_empty() {
        return Err(LoadError::Empty.into());
    }

    let store = ObjectStore::from_objects(content.objects)?;
    let index = DependencyIndex::build(&store, content.dependencies)?;
    let columns = ColumnLineageIndex::build(&store, content.column_dependencies)?;

    let metadata = LoadMetadata {
        cache: content.metadata.unwrap_or_default(),
        loaded_at: Utc::now(),
        checksum: artifact.checksum().to_string(),
        origin,
        format: artifact.format().to_string(),
        object_count: store.len(),
        dependency_count: index.edge_count(),
        column_dependency_count: columns.len(),
    };

    tracing::info!(
        origin = %metadata.origin,
        objects = metadata.object_count,
        dependencies = metadata.dependency_count,
        column_dependencies = metadata.column_dependency_count,
        checksum = %&metadata.checksum[..12.min(metadata.checksum.len())],
        elapsed_ms = started.elapsed().as_millis(),
        "Lineage cache loaded"
    );

    Ok(Snapshot::new(store, index, columns, metadata))
}

/// Read and load a cache file, inferring the encoding from its extension.
///
/// # Errors
///
/// See [`load_snapshot`]; additionally fails if the file cannot be read or
/// its extension is not `.json`, `.jsonl` or `.ndjson`.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let artifact = read_artifact(path).await?;
    load_snapshot(artifact, path.display().to_string()).await
}

async fn decode(artifact: &RawArtifact) -> Result<CacheContent> {
    match artifact.format() {
        CacheFormat::Json => {
            let document: CacheDocument = decode_document(artifact)?;
            let objects = document
                .objects
                .ok_or(LoadError::MissingSection("objects"))?
                .into_objects()?;
            let (dependencies, column_dependencies) = document
                .dependencies
                .ok_or(LoadError::MissingSection("dependencies"))?
                .into_parts();
            Ok(CacheContent {
                metadata: document.metadata,
                objects,
                dependencies,
                column_dependencies,
            })
        }
        CacheFormat::JsonLines => {
            let records: Vec<CacheRecord> = decode_lines(artifact).await?;
            let mut content = CacheContent::default();
            for record in records {
                match record {
                    // A later header replaces an earlier one.
                    CacheRecord::Metadata(metadata) => content.metadata = Some(metadata),
                    CacheRecord::Object(object) => content.objects.push(*object),
                    CacheRecord::Dependency(dep) => content.dependencies.push(dep),
                    CacheRecord::ColumnDependency(dep) => content.column_dependencies.push(dep),
                }
            }
            Ok(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn json(text: &str) -> RawArtifact {
        RawArtifact::from_bytes(CacheFormat::Json, text.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn missing_objects_section_is_rejected() {
        let err = load_snapshot(json(r#"{"dependencies": []}"#), "test")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::MissingSection("objects"))));
    }

    #[tokio::test]
    async fn missing_dependencies_section_is_rejected() {
        let err = load_snapshot(
            json(
                r#"{"objects": [{"id":"S.A","schema":"S","name":"A","type":"TABLE","owner":"o","object_id":1}]}"#,
            ),
            "test",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::MissingSection("dependencies"))));
    }

    #[tokio::test]
    async fn empty_object_map_is_rejected() {
        let err = load_snapshot(json(r#"{"objects": {}, "dependencies": []}"#), "test")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::Empty)));
    }

    #[tokio::test]
    async fn records_checksum_and_counts() {
        let artifact = json(
            r#"{"metadata": {"version": "2"},
                "objects": [{"id":"S.A","schema":"S","name":"A","type":"TABLE","owner":"o","object_id":1}],
                "dependencies": {"table_level": []},
                "indexes": {"by_schema": {"S": ["S.A"]}}}"#,
        );
        let checksum = artifact.checksum().to_string();

        let snapshot = load_snapshot(artifact, "memory").await.unwrap();
        let meta = snapshot.metadata();
        assert_eq!(meta.checksum, checksum);
        assert_eq!(meta.object_count, 1);
        assert_eq!(meta.format, "json");
        assert_eq!(meta.cache.version.as_deref(), Some("2"));
    }
}
