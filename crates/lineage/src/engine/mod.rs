//! Lineage graph engine.
//!
//! Answers bounded breadth-first lineage queries over one snapshot's
//! [`ObjectStore`] and [`DependencyIndex`]. The engine holds no state between
//! calls: it is a cheap view that borrows the snapshot, so any number of
//! queries may run against the same generation concurrently.
//!
//! # Example
//!
//! ```no_run
//! use lineage::engine::Depth;
//! use lineage::service::LineageService;
//!
//! # async fn example() -> lineage::error::Result<()> {
//! let service = LineageService::open("data/lineage_cache.json").await?;
//! let snapshot = service.snapshot()?;
//! let result = snapshot.engine().forward("DWH.FACT_SALES", Depth::new(2))?;
//! for node in &result.nodes {
//!     println!("{} more={:?}", node.id, result.has_more_for(node.id.as_str()));
//! }
//! # Ok(())
//! # }
//! ```

mod result;
mod traversal;

pub use result::{DirectionalLineage, FullLineage};

use crate::domain::{DatabaseObject, TableLevelDependency};
use crate::error::{Error, Result};
use crate::index::{DependencyIndex, Direction, EdgeId};
use crate::store::{NodeId, ObjectStore};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};
use traversal::Traversal;

/// Default cap on the number of nodes a single directional query returns.
pub const MAX_LINEAGE_NODES: usize = 1000;

/// Traversal depth, clamped to `[0, Depth::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Depth(u32);

impl Depth {
    /// Deepest allowed expansion.
    pub const MAX: Depth = Depth(10);

    /// Depth used when the caller does not pick one.
    pub const DEFAULT: Depth = Depth(2);

    /// Clamp any requested depth into range; negative values become 0.
    #[must_use]
    pub fn new(requested: i64) -> Self {
        let clamped = requested.clamp(0, i64::from(Self::MAX.0));
        Self(u32::try_from(clamped).unwrap_or(Self::MAX.0))
    }

    /// Number of hops.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for Depth {
    fn from(requested: u32) -> Self {
        Self::new(i64::from(requested))
    }
}

/// Absolute deadline for one query.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    started: Instant,
    at: Instant,
}

/// Stateless query front end over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LineageEngine<'s> {
    store: &'s ObjectStore,
    index: &'s DependencyIndex,
    node_limit: usize,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl<'s> LineageEngine<'s> {
    /// Engine with the default node cap and no deadline.
    #[must_use]
    pub fn new(store: &'s ObjectStore, index: &'s DependencyIndex) -> Self {
        Self {
            store,
            index,
            node_limit: MAX_LINEAGE_NODES,
            timeout: None,
            deadline: None,
        }
    }

    /// Override the node cap. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit.max(1);
        self
    }

    /// Abort each query that runs longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort any query still running at `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The effective node cap.
    #[must_use]
    pub fn node_limit(&self) -> usize {
        self.node_limit
    }

    /// Downstream lineage: objects that consume `root`, transitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] if `root` is unknown and
    /// [`Error::DeadlineExceeded`] if a deadline elapses.
    pub fn forward(&self, root: &str, depth: Depth) -> Result<DirectionalLineage<'s>> {
        self.directional(root, Direction::Forward, depth)
    }

    /// Upstream lineage: objects `root` is built from, transitively.
    ///
    /// # Errors
    ///
    /// Same as [`LineageEngine::forward`].
    pub fn backward(&self, root: &str, depth: Depth) -> Result<DirectionalLineage<'s>> {
        self.directional(root, Direction::Backward, depth)
    }

    /// Lineage in one direction.
    ///
    /// # Errors
    ///
    /// Same as [`LineageEngine::forward`].
    pub fn directional(
        &self,
        root: &str,
        direction: Direction,
        depth: Depth,
    ) -> Result<DirectionalLineage<'s>> {
        let root_node = self.resolve(root)?;
        let deadline = self.deadline();
        let traversal = traversal::expand(
            self.index,
            root_node,
            direction,
            depth.get(),
            self.node_limit,
            deadline.as_ref(),
        )?;

        tracing::debug!(
            root,
            ?direction,
            depth = depth.get(),
            nodes = traversal.nodes.len(),
            edges = traversal.edges.len(),
            truncated = traversal.truncated,
            "Lineage query"
        );

        Ok(DirectionalLineage {
            direction,
            root: &self.store.object(root_node).id,
            depth,
            nodes: self.objects(&traversal.nodes),
            edges: self.dependencies(&traversal.edges),
            has_more: self.has_more_map(&traversal),
            truncated: traversal.truncated,
        })
    }

    /// Upstream and downstream lineage around `root`, merged.
    ///
    /// Both sides are expanded independently, each with its own node cap.
    /// Nodes and edges are unioned without duplicates; the has-more maps come
    /// from the side that computed them.
    ///
    /// # Errors
    ///
    /// Same as [`LineageEngine::forward`].
    pub fn full(&self, root: &str, upstream: Depth, downstream: Depth) -> Result<FullLineage<'s>> {
        let root_node = self.resolve(root)?;
        let deadline = self.deadline();
        let up = traversal::expand(
            self.index,
            root_node,
            Direction::Backward,
            upstream.get(),
            self.node_limit,
            deadline.as_ref(),
        )?;
        let down = traversal::expand(
            self.index,
            root_node,
            Direction::Forward,
            downstream.get(),
            self.node_limit,
            deadline.as_ref(),
        )?;

        let mut seen_nodes = HashSet::new();
        let nodes: Vec<NodeId> = up
            .nodes
            .iter()
            .chain(&down.nodes)
            .copied()
            .filter(|node| seen_nodes.insert(*node))
            .collect();

        let mut seen_edges = HashSet::new();
        let edges: Vec<EdgeId> = up
            .edges
            .iter()
            .chain(&down.edges)
            .copied()
            .filter(|edge| seen_edges.insert(*edge))
            .collect();

        tracing::debug!(
            root,
            upstream = upstream.get(),
            downstream = downstream.get(),
            nodes = nodes.len(),
            edges = edges.len(),
            truncated = up.truncated || down.truncated,
            "Full lineage query"
        );

        Ok(FullLineage {
            root_object: self.store.object(root_node),
            nodes: self.objects(&nodes),
            edges: self.dependencies(&edges),
            has_more_upstream: self.has_more_map(&up),
            has_more_downstream: self.has_more_map(&down),
            upstream_truncated: up.truncated,
            downstream_truncated: down.truncated,
        })
    }

    fn resolve(&self, id: &str) -> Result<NodeId> {
        self.store
            .node_id(id)
            .ok_or_else(|| Error::ObjectNotFound(id.into()))
    }

    fn deadline(&self) -> Option<Deadline> {
        let started = Instant::now();
        let from_timeout = self.timeout.map(|timeout| started + timeout);
        let at = match (self.deadline, from_timeout) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        at.map(|at| Deadline { started, at })
    }

    fn objects(&self, nodes: &[NodeId]) -> Vec<&'s DatabaseObject> {
        nodes.iter().map(|&node| self.store.object(node)).collect()
    }

    fn dependencies(&self, edges: &[EdgeId]) -> Vec<&'s TableLevelDependency> {
        edges.iter().map(|&edge| self.index.edge(edge)).collect()
    }

    fn has_more_map(&self, traversal: &Traversal) -> BTreeMap<&'s str, bool> {
        traversal
            .nodes
            .iter()
            .zip(&traversal.has_more)
            .map(|(&node, &more)| (self.store.object(node).id.as_str(), more))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-5, 0)]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(10, 10)]
    #[case(11, 10)]
    #[case(i64::MAX, 10)]
    fn depth_is_clamped(#[case] requested: i64, #[case] expected: u32) {
        assert_eq!(Depth::new(requested).get(), expected);
    }

    #[test]
    fn default_depth_is_two() {
        assert_eq!(Depth::default().get(), 2);
    }
}
