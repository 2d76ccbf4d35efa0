//! Dependency index: forward and backward adjacency over dense ids.
//!
//! # Edge Direction
//!
//! Edges point from **provider to consumer**. A table read by a view yields
//! `TABLE -> VIEW`, so the view is found in the table's [`Direction::Forward`]
//! bucket and the table in the view's [`Direction::Backward`] bucket.
//!
//! Every edge contributes exactly one entry to each side. Buckets keep
//! edge-list order, which gives traversal a stable tie-break.

use crate::domain::{ObjectId, TableLevelDependency};
use crate::error::LoadError;
use crate::store::{NodeId, ObjectStore};
use serde::Serialize;

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Downstream: towards consumers
    Forward,
    /// Upstream: towards providers
    Backward,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Position of an edge in the loaded edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Position in the edge list.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One adjacency entry: the node on the other end and the edge leading there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    /// Neighbor node
    pub node: NodeId,
    /// Connecting edge
    pub edge: EdgeId,
}

/// Forward and backward adjacency, built once per generation.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    edges: Vec<TableLevelDependency>,
    endpoints: Vec<(NodeId, NodeId)>,
    forward: Vec<Vec<Adjacent>>,
    backward: Vec<Vec<Adjacent>>,
}

impl DependencyIndex {
    /// Build the index for `store` from the flat edge list.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DanglingEdge`] for the first edge whose source or
    /// target is not in the store.
    pub fn build(
        store: &ObjectStore,
        edges: Vec<TableLevelDependency>,
    ) -> Result<Self, LoadError> {
        let mut forward = vec![Vec::new(); store.len()];
        let mut backward = vec![Vec::new(); store.len()];
        let mut endpoints = Vec::with_capacity(edges.len());

        for (index, dep) in edges.iter().enumerate() {
            let dangling = |missing: &ObjectId| LoadError::DanglingEdge {
                index,
                from: dep.source_id.clone(),
                to: dep.target_id.clone(),
                missing: missing.clone(),
            };
            let from = store
                .node_id(dep.source_id.as_str())
                .ok_or_else(|| dangling(&dep.source_id))?;
            let to = store
                .node_id(dep.target_id.as_str())
                .ok_or_else(|| dangling(&dep.target_id))?;

            let edge = EdgeId(u32::try_from(index).unwrap_or(u32::MAX));
            forward[from.index()].push(Adjacent { node: to, edge });
            backward[to.index()].push(Adjacent { node: from, edge });
            endpoints.push((from, to));
        }

        Ok(Self {
            edges,
            endpoints,
            forward,
            backward,
        })
    }

    /// Neighbors of `node` in `direction`, in edge-list order.
    ///
    /// A node without edges that way yields an empty slice.
    #[must_use]
    pub fn neighbors(&self, node: NodeId, direction: Direction) -> &[Adjacent] {
        let buckets = match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        };
        buckets
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The dependency record behind an edge id.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> &TableLevelDependency {
        &self.edges[edge.index()]
    }

    /// Source and target of an edge.
    #[must_use]
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        self.endpoints[edge.index()]
    }

    /// Source and target of every edge, in load order.
    pub fn endpoint_pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + use<'_> {
        self.endpoints.iter().copied()
    }

    /// All edges in load order.
    #[must_use]
    pub fn edges(&self) -> &[TableLevelDependency] {
        &self.edges
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Out-degree (forward) or in-degree (backward) of a node.
    #[must_use]
    pub fn degree(&self, node: NodeId, direction: Direction) -> usize {
        self.neighbors(node, direction).len()
    }
}
