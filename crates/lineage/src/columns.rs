//! Column-level lineage lookup.
//!
//! Column dependencies are a side dataset shipped with the cache. They are
//! indexed once per generation and only looked up; nothing here derives
//! column lineage from SQL.

use crate::domain::{ColumnLevelDependency, ColumnRef, ObjectId};
use crate::engine::Depth;
use crate::error::LoadError;
use crate::store::ObjectStore;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Which side of a column to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDirection {
    /// Columns this column is computed from
    Upstream,
    /// Columns computed from this column
    Downstream,
    /// Both sides
    #[default]
    Both,
}

impl ColumnDirection {
    fn includes_upstream(self) -> bool {
        matches!(self, Self::Upstream | Self::Both)
    }

    fn includes_downstream(self) -> bool {
        matches!(self, Self::Downstream | Self::Both)
    }
}

impl fmt::Display for ColumnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
            Self::Both => "both",
        })
    }
}

impl FromStr for ColumnDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upstream" => Ok(Self::Upstream),
            "downstream" => Ok(Self::Downstream),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown column direction: {other}")),
        }
    }
}

/// A column found upstream, with the transformation that links it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceColumn<'s> {
    /// Owning object
    pub object_id: &'s ObjectId,
    /// Column name
    pub column: &'s str,
    /// Transformation expression, if any
    pub transformation: Option<&'s str>,
    /// Transformation kind
    pub transformation_type: &'s str,
}

/// A column found downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetColumn<'s> {
    /// Owning object
    pub object_id: &'s ObjectId,
    /// Column name
    pub column: &'s str,
}

/// Result of a column lineage lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnLineage<'s> {
    /// The column the lookup started from
    pub column: ColumnRef,
    /// Dependencies met, upstream ones first
    pub dependencies: Vec<&'s ColumnLevelDependency>,
    /// Upstream columns in BFS order
    pub sources: Vec<SourceColumn<'s>>,
    /// Downstream columns in BFS order
    pub targets: Vec<TargetColumn<'s>>,
}

/// Column dependencies indexed by column, per generation.
#[derive(Debug, Default)]
pub struct ColumnLineageIndex {
    dependencies: Vec<ColumnLevelDependency>,
    forward: HashMap<ColumnRef, Vec<usize>>,
    backward: HashMap<ColumnRef, Vec<usize>>,
    by_object: HashMap<ObjectId, BTreeSet<String>>,
}

impl ColumnLineageIndex {
    /// Index `dependencies`, rejecting records that name unknown objects.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DanglingColumnDependency`] for the first record
    /// whose source or target object is not in `store`.
    pub fn build(
        store: &ObjectStore,
        dependencies: Vec<ColumnLevelDependency>,
    ) -> Result<Self, LoadError> {
        let mut index = Self::default();

        for (position, dep) in dependencies.iter().enumerate() {
            for object in [&dep.source_object, &dep.target_object] {
                if !store.exists(object.as_str()) {
                    return Err(LoadError::DanglingColumnDependency {
                        index: position,
                        object: object.clone(),
                    });
                }
            }

            index.forward.entry(dep.source()).or_default().push(position);
            index.backward.entry(dep.target()).or_default().push(position);
            index
                .by_object
                .entry(dep.source_object.clone())
                .or_default()
                .insert(dep.source_column.clone());
            index
                .by_object
                .entry(dep.target_object.clone())
                .or_default()
                .insert(dep.target_column.clone());
        }

        index.dependencies = dependencies;
        Ok(index)
    }

    /// Follow `column` of `object` in `direction` for up to `depth` hops.
    ///
    /// A column is never visited twice within one direction. Unknown
    /// columns yield an empty result.
    #[must_use]
    pub fn lineage(
        &self,
        object: &str,
        column: &str,
        direction: ColumnDirection,
        depth: Depth,
    ) -> ColumnLineage<'_> {
        let start = ColumnRef::new(object, column);
        let mut result = ColumnLineage {
            column: start.clone(),
            dependencies: Vec::new(),
            sources: Vec::new(),
            targets: Vec::new(),
        };

        if direction.includes_upstream() {
            for dep in self.walk(&start, depth, &self.backward, |dep| dep.source()) {
                result.dependencies.push(dep);
                result.sources.push(SourceColumn {
                    object_id: &dep.source_object,
                    column: &dep.source_column,
                    transformation: dep.transformation.as_deref(),
                    transformation_type: &dep.transformation_type,
                });
            }
        }

        if direction.includes_downstream() {
            for dep in self.walk(&start, depth, &self.forward, |dep| dep.target()) {
                result.dependencies.push(dep);
                result.targets.push(TargetColumn {
                    object_id: &dep.target_object,
                    column: &dep.target_column,
                });
            }
        }

        result
    }

    /// Depth-1 lineage in both directions for every column of `object`
    /// that has lineage, keyed by column name.
    #[must_use]
    pub fn object_lineage(&self, object: &str) -> BTreeMap<&str, ColumnLineage<'_>> {
        self.columns_with_lineage(object)
            .into_iter()
            .map(|column| {
                let lineage = self.lineage(object, column, ColumnDirection::Both, Depth::new(1));
                (column, lineage)
            })
            .collect()
    }

    /// Sorted names of the columns of `object` that take part in lineage.
    #[must_use]
    pub fn columns_with_lineage(&self, object: &str) -> Vec<&str> {
        self.by_object
            .get(object)
            .map(|columns| columns.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether any column of `object` takes part in lineage.
    #[must_use]
    pub fn has_column_lineage(&self, object: &str) -> bool {
        self.by_object
            .get(object)
            .is_some_and(|columns| !columns.is_empty())
    }

    /// Every column dependency where `object` is the source or the target.
    #[must_use]
    pub fn dependencies_for(&self, object: &str) -> Vec<&ColumnLevelDependency> {
        self.dependencies
            .iter()
            .filter(|dep| dep.source_object.as_str() == object || dep.target_object.as_str() == object)
            .collect()
    }

    /// Number of column dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns `true` if there are no column dependencies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Number of objects with at least one column in lineage.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.by_object.len()
    }

    /// All column dependencies in load order.
    #[must_use]
    pub fn dependencies(&self) -> &[ColumnLevelDependency] {
        &self.dependencies
    }

    fn walk(
        &self,
        start: &ColumnRef,
        depth: Depth,
        adjacency: &HashMap<ColumnRef, Vec<usize>>,
        next: impl Fn(&ColumnLevelDependency) -> ColumnRef,
    ) -> Vec<&ColumnLevelDependency> {
        let mut met = Vec::new();
        let mut visited = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([(start.clone(), 0u32)]);

        while let Some((current, level)) = queue.pop_front() {
            if level >= depth.get() {
                continue;
            }
            for &position in adjacency.get(&current).into_iter().flatten() {
                let dep = &self.dependencies[position];
                let neighbor = next(dep);
                if visited.insert(neighbor.clone()) {
                    met.push(dep);
                    queue.push_back((neighbor, level + 1));
                }
            }
        }

        met
    }
}
