//! On-disk shapes of the lineage cache.

use crate::domain::{timestamp, ColumnLevelDependency, DatabaseObject, TableLevelDependency};
use crate::error::LoadError;
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Descriptive header of a cache artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Cache format or extractor version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// When the extractor produced the cache
    #[serde(
        default,
        alias = "extracted_at",
        with = "timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<DateTime<Utc>>,

    /// Database or system the cache was extracted from
    #[serde(default, alias = "source_database", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Counts and anything else the extractor recorded
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Whole-document cache layout.
///
/// A precomputed `indexes` section may be present; it is not read.
#[derive(Debug, Deserialize)]
pub(crate) struct CacheDocument {
    #[serde(default)]
    pub(crate) metadata: Option<CacheMetadata>,
    #[serde(default)]
    pub(crate) objects: Option<ObjectSection>,
    #[serde(default)]
    pub(crate) dependencies: Option<DependencySection>,
}

/// The `objects` section: either a list of records or a map keyed by id.
#[derive(Debug, Default)]
pub(crate) struct ObjectSection {
    entries: Vec<(Option<String>, DatabaseObject)>,
}

impl ObjectSection {
    /// Records in document order, checking map keys against record ids.
    pub(crate) fn into_objects(self) -> Result<Vec<DatabaseObject>, LoadError> {
        self.entries
            .into_iter()
            .map(|(key, object)| match key {
                Some(key) if key != object.id.as_str() => Err(LoadError::ObjectKeyMismatch {
                    key,
                    id: object.id,
                }),
                _ => Ok(object),
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for ObjectSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ObjectSectionVisitor)
    }
}

struct ObjectSectionVisitor;

impl<'de> Visitor<'de> for ObjectSectionVisitor {
    type Value = ObjectSection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of objects or a map from object id to object")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(object) = seq.next_element::<DatabaseObject>()? {
            entries.push((None, object));
        }
        Ok(ObjectSection { entries })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, object)) = map.next_entry::<String, DatabaseObject>()? {
            entries.push((Some(key), object));
        }
        Ok(ObjectSection { entries })
    }
}

/// The `dependencies` section: split by level, or a bare edge list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DependencySection {
    Flat(Vec<TableLevelDependency>),
    Split {
        #[serde(default)]
        table_level: Vec<TableLevelDependency>,
        #[serde(default)]
        column_level: Vec<ColumnLevelDependency>,
    },
}

impl DependencySection {
    pub(crate) fn into_parts(self) -> (Vec<TableLevelDependency>, Vec<ColumnLevelDependency>) {
        match self {
            Self::Flat(table_level) => (table_level, Vec::new()),
            Self::Split {
                table_level,
                column_level,
            } => (table_level, column_level),
        }
    }
}

/// One line of a JSON Lines cache.
#[derive(Debug, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub(crate) enum CacheRecord {
    Metadata(CacheMetadata),
    Object(Box<DatabaseObject>),
    Dependency(TableLevelDependency),
    ColumnDependency(ColumnLevelDependency),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(id: &str) -> serde_json::Value {
        json!({"id": id, "schema": "S", "name": id, "type": "TABLE", "owner": "o", "object_id": 1})
    }

    #[test]
    fn objects_as_list_or_map() {
        let list: ObjectSection = serde_json::from_value(json!([table("S.A"), table("S.B")])).unwrap();
        assert_eq!(list.into_objects().unwrap().len(), 2);

        let map: ObjectSection =
            serde_json::from_value(json!({"S.A": table("S.A"), "S.B": table("S.B")})).unwrap();
        let ids: Vec<_> = map
            .into_objects()
            .unwrap()
            .into_iter()
            .map(|o| o.id.to_string())
            .collect();
        assert_eq!(ids, vec!["S.A", "S.B"]);
    }

    #[test]
    fn map_key_must_match_record_id() {
        let map: ObjectSection = serde_json::from_value(json!({"S.WRONG": table("S.A")})).unwrap();
        assert!(matches!(
            map.into_objects(),
            Err(LoadError::ObjectKeyMismatch { key, .. }) if key == "S.WRONG"
        ));
    }

    #[test]
    fn dependencies_split_or_flat() {
        let edge = json!({"source_id": "S.A", "target_id": "S.B",
                          "dependency_type": "VIEW", "reference_type": "SELECT"});

        let flat: DependencySection = serde_json::from_value(json!([edge.clone()])).unwrap();
        let (tables, columns) = flat.into_parts();
        assert_eq!((tables.len(), columns.len()), (1, 0));

        let split: DependencySection = serde_json::from_value(json!({
            "table_level": [edge],
            "column_level": [{"source_object_id": "S.A", "source_column": "X",
                              "target_object_id": "S.B", "target_column": "X"}]
        }))
        .unwrap();
        let (tables, columns) = split.into_parts();
        assert_eq!((tables.len(), columns.len()), (1, 1));
    }

    #[test]
    fn metadata_keeps_extras_and_aliases() {
        let meta: CacheMetadata = serde_json::from_value(json!({
            "version": "1.0.0",
            "extracted_at": "2024-06-01T12:00:00",
            "source_database": "EXASOL_PROD",
            "object_count": 3
        }))
        .unwrap();
        assert_eq!(meta.source.as_deref(), Some("EXASOL_PROD"));
        assert!(meta.generated_at.is_some());
        assert_eq!(meta.extra["object_count"], 3);
    }

    #[test]
    fn tagged_records() {
        let record: CacheRecord = serde_json::from_value(json!({
            "record": "object", "id": "S.A", "schema": "S", "name": "A",
            "type": "VIEW", "owner": "o", "object_id": 1, "definition": "SELECT 1"
        }))
        .unwrap();
        assert!(matches!(record, CacheRecord::Object(o) if o.id.as_str() == "S.A"));

        let record: CacheRecord = serde_json::from_value(json!({"record": "metadata"})).unwrap();
        assert!(matches!(record, CacheRecord::Metadata(_)));
    }
}
