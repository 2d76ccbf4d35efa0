//! One immutable generation of the lineage cache.

use crate::catalog::Catalog;
use crate::columns::{ColumnDirection, ColumnLineage, ColumnLineageIndex};
use crate::domain::{ColumnLevelDependency, DatabaseObject, ObjectId};
use crate::engine::{Depth, LineageEngine};
use crate::error::{Error, Result};
use crate::index::DependencyIndex;
use crate::loader::LoadMetadata;
use crate::store::ObjectStore;
use std::collections::BTreeMap;

/// Object store, dependency index, column lineage and load metadata built
/// from a single cache load. Never mutated after construction; a reload
/// produces a new `Snapshot`.
#[derive(Debug)]
pub struct Snapshot {
    store: ObjectStore,
    index: DependencyIndex,
    columns: ColumnLineageIndex,
    metadata: LoadMetadata,
}

impl Snapshot {
    pub(crate) fn new(
        store: ObjectStore,
        index: DependencyIndex,
        columns: ColumnLineageIndex,
        metadata: LoadMetadata,
    ) -> Self {
        Self {
            store,
            index,
            columns,
            metadata,
        }
    }

    /// Objects of this generation.
    #[must_use]
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Table-level adjacency of this generation.
    #[must_use]
    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    /// Column-level lineage of this generation.
    #[must_use]
    pub fn columns(&self) -> &ColumnLineageIndex {
        &self.columns
    }

    /// How and when this generation was loaded.
    #[must_use]
    pub fn metadata(&self) -> &LoadMetadata {
        &self.metadata
    }

    /// Query engine with default limits.
    #[must_use]
    pub fn engine(&self) -> LineageEngine<'_> {
        LineageEngine::new(&self.store, &self.index)
    }

    /// Search, listing and statistics.
    #[must_use]
    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(self)
    }

    /// Exact-id object lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] for unknown ids.
    pub fn get_object(&self, id: &str) -> Result<&DatabaseObject> {
        self.store.get(id)
    }

    /// Column lineage of one column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] if `object` is unknown. An unknown
    /// column of a known object yields an empty result.
    pub fn column_lineage(
        &self,
        object: &str,
        column: &str,
        direction: ColumnDirection,
        depth: Depth,
    ) -> Result<ColumnLineage<'_>> {
        self.require(object)?;
        Ok(self.columns.lineage(object, column, direction, depth))
    }

    /// Depth-1 lineage for every column of `object` that has any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] if `object` is unknown.
    pub fn object_column_lineage(&self, object: &str) -> Result<BTreeMap<&str, ColumnLineage<'_>>> {
        self.require(object)?;
        Ok(self.columns.object_lineage(object))
    }

    /// Column dependencies touching `object`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] if `object` is unknown.
    pub fn column_dependencies_for(&self, object: &str) -> Result<Vec<&ColumnLevelDependency>> {
        self.require(object)?;
        Ok(self.columns.dependencies_for(object))
    }

    fn require(&self, object: &str) -> Result<()> {
        if self.store.exists(object) {
            Ok(())
        } else {
            Err(Error::ObjectNotFound(ObjectId::new(object)))
        }
    }
}
