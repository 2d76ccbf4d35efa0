//! Query results, borrowing from the snapshot they were computed against.

use super::Depth;
use crate::domain::{DatabaseObject, ObjectId, TableLevelDependency};
use crate::index::Direction;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a forward or backward query.
#[derive(Debug, Clone, Serialize)]
pub struct DirectionalLineage<'s> {
    /// Direction that was expanded
    pub direction: Direction,
    /// Root object id
    pub root: &'s ObjectId,
    /// Effective (clamped) depth
    pub depth: Depth,
    /// Result nodes in BFS order, root first
    pub nodes: Vec<&'s DatabaseObject>,
    /// Edges met during expansion, in discovery order
    pub edges: Vec<&'s TableLevelDependency>,
    /// Per result node: expanding further in `direction` would reveal new nodes
    pub has_more: BTreeMap<&'s str, bool>,
    /// The node cap cut the result short
    pub truncated: bool,
}

impl DirectionalLineage<'_> {
    /// Whether `id` is among the result nodes.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.has_more.contains_key(id)
    }

    /// The has-more flag for `id`, if it is a result node.
    #[must_use]
    pub fn has_more_for(&self, id: &str) -> Option<bool> {
        self.has_more.get(id).copied()
    }

    /// Result node ids in BFS order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|object| object.id.as_str())
    }
}

/// Outcome of a combined upstream and downstream query.
#[derive(Debug, Clone, Serialize)]
pub struct FullLineage<'s> {
    /// The root object
    pub root_object: &'s DatabaseObject,
    /// Union of both directions, root first, no duplicates
    pub nodes: Vec<&'s DatabaseObject>,
    /// Union of both edge sets, no duplicates
    pub edges: Vec<&'s TableLevelDependency>,
    /// From the backward expansion, keyed by its result nodes
    pub has_more_upstream: BTreeMap<&'s str, bool>,
    /// From the forward expansion, keyed by its result nodes
    pub has_more_downstream: BTreeMap<&'s str, bool>,
    /// The node cap cut the upstream side short
    pub upstream_truncated: bool,
    /// The node cap cut the downstream side short
    pub downstream_truncated: bool,
}

impl FullLineage<'_> {
    /// Whether `id` is among the result nodes.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.has_more_upstream.contains_key(id) || self.has_more_downstream.contains_key(id)
    }

    /// Result node ids, root first.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|object| object.id.as_str())
    }

    /// Either side was truncated.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.upstream_truncated || self.downstream_truncated
    }
}
