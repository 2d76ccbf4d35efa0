//! Read-only catalog views: search, paging, schema and type lists, stats.

use crate::domain::{DatabaseObject, ObjectType};
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Results returned by [`Catalog::search`] when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Upper bound for search limits.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Page size used by [`Catalog::list`] when none is given.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound for page sizes.
pub const MAX_PAGE_SIZE: usize = 200;

/// Optional narrowing by schema and type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectFilter {
    /// Exact schema name
    pub schema: Option<String>,
    /// Object type
    pub object_type: Option<ObjectType>,
}

impl ObjectFilter {
    fn matches(&self, object: &DatabaseObject) -> bool {
        self.schema.as_deref().is_none_or(|schema| object.schema == schema)
            && self.object_type.is_none_or(|t| object.object_type() == t)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<'s> {
    /// Objects on this page, sorted by id
    pub items: Vec<&'s DatabaseObject>,
    /// Objects matching the filter across all pages
    pub total: usize,
    /// 1-based page number
    pub page: usize,
    /// Effective page size
    pub page_size: usize,
    /// Number of pages
    pub total_pages: usize,
}

/// Summary counts of a generation.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    /// Number of objects
    pub total_objects: usize,
    /// Number of table-level dependencies
    pub total_dependencies: usize,
    /// Number of column-level dependencies
    pub total_column_dependencies: usize,
    /// Objects with at least one column in lineage
    pub objects_with_column_lineage: usize,
    /// Distinct schemas
    pub schemas: usize,
    /// Exasol tables
    pub tables: usize,
    /// Exasol views
    pub views: usize,
    /// Lua UDFs
    pub udfs: usize,
    /// Virtual schemas
    pub virtual_schemas: usize,
    /// Connections
    pub connections: usize,
    /// Count for every type present
    pub by_type: BTreeMap<ObjectType, usize>,
    /// When the generation was loaded
    pub loaded_at: DateTime<Utc>,
}

/// Catalog queries over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'s> {
    snapshot: &'s Snapshot,
}

impl<'s> Catalog<'s> {
    pub(crate) fn new(snapshot: &'s Snapshot) -> Self {
        Self { snapshot }
    }

    /// Case-insensitive substring search over name, schema and id.
    ///
    /// Results keep load order. `limit` defaults to [`DEFAULT_SEARCH_LIMIT`]
    /// and is clamped to `[1, MAX_SEARCH_LIMIT]`.
    #[must_use]
    pub fn search(
        &self,
        query: &str,
        limit: Option<usize>,
        filter: &ObjectFilter,
    ) -> Vec<&'s DatabaseObject> {
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let needle = query.trim().to_lowercase();

        self.candidates(filter)
            .filter(|object| {
                object.name.to_lowercase().contains(&needle)
                    || object.schema.to_lowercase().contains(&needle)
                    || object.id.as_str().to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    /// Objects sorted by id, one page at a time.
    ///
    /// Pages are 1-based; page 0 is read as page 1. `page_size` defaults to
    /// [`DEFAULT_PAGE_SIZE`] and is clamped to `[1, MAX_PAGE_SIZE]`. A page
    /// past the end is empty.
    #[must_use]
    pub fn list(&self, page: usize, page_size: Option<usize>, filter: &ObjectFilter) -> Page<'s> {
        let page = page.max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let mut matching: Vec<&DatabaseObject> = self.candidates(filter).collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Page {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }

    /// Distinct schema names, sorted.
    #[must_use]
    pub fn schemas(&self) -> Vec<&'s str> {
        self.snapshot.store().schemas().collect()
    }

    /// Object types present, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<ObjectType> {
        self.snapshot.store().types().collect()
    }

    /// Summary counts.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let store = self.snapshot.store();
        let columns = self.snapshot.columns();

        Statistics {
            total_objects: store.len(),
            total_dependencies: self.snapshot.index().edge_count(),
            total_column_dependencies: columns.len(),
            objects_with_column_lineage: columns.object_count(),
            schemas: store.schemas().count(),
            tables: store.count_of(ObjectType::Table),
            views: store.count_of(ObjectType::View),
            udfs: store.count_of(ObjectType::LuaUdf),
            virtual_schemas: store.count_of(ObjectType::VirtualSchema),
            connections: store.count_of(ObjectType::Connection),
            by_type: store
                .types()
                .map(|t| (t, store.count_of(t)))
                .collect(),
            loaded_at: self.snapshot.metadata().loaded_at,
        }
    }

    fn candidates(&self, filter: &ObjectFilter) -> Box<dyn Iterator<Item = &'s DatabaseObject> + 's> {
        let store = self.snapshot.store();
        let filter = filter.clone();
        let base: Box<dyn Iterator<Item = &'s DatabaseObject> + 's> =
            match (filter.schema.as_deref(), filter.object_type) {
                (Some(schema), _) => Box::new(store.in_schema(schema)),
                (None, Some(object_type)) => Box::new(store.of_type(object_type)),
                (None, None) => Box::new(store.all().iter()),
            };
        Box::new(base.filter(move |object| filter.matches(object)))
    }
}
