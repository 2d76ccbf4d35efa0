//! Breadth-first expansion over the dependency index.

use super::Deadline;
use crate::error::{Error, Result};
use crate::index::{DependencyIndex, Direction, EdgeId};
use crate::store::NodeId;
use std::collections::{HashSet, VecDeque};

/// Raw outcome of one directional expansion, in dense ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Traversal {
    /// Result nodes in discovery order; the root comes first.
    pub(super) nodes: Vec<NodeId>,
    /// Edges met while expanding, in discovery order.
    pub(super) edges: Vec<EdgeId>,
    /// Parallel to `nodes`: some neighbor lies outside the result.
    pub(super) has_more: Vec<bool>,
    /// The node cap left out nodes within the depth bound.
    pub(super) truncated: bool,
}

/// Expand from `root` up to `depth` hops, keeping at most `limit` nodes.
///
/// Every edge leaving an expanded node is recorded, including edges into
/// nodes that were already visited. Once the result holds `limit` nodes no
/// further node is admitted: the node being expanded still records its edges
/// into the result, then the expansion stops. The kept nodes are therefore
/// the closest ones in BFS order and every edge of an expanded node between
/// two kept nodes is returned. `has_more` is computed afterwards against the final node set.
/// The result counts as truncated only if the cap left out a node that lies
/// within `depth`.
pub(super) fn expand(
    index: &DependencyIndex,
    root: NodeId,
    direction: Direction,
    depth: u32,
    limit: usize,
    deadline: Option<&Deadline>,
) -> Result<Traversal> {
    let limit = limit.max(1);
    let mut visited: HashSet<NodeId> = HashSet::from([root]);
    let mut nodes = vec![root];
    let mut levels = vec![0];
    let mut edges = Vec::new();
    let mut queue: VecDeque<(NodeId, u32)> = VecDeque::from([(root, 0)]);
    let mut capped = false;

    while let Some(&(current, level)) = queue.front() {
        // Levels never decrease along the queue.
        if level >= depth {
            break;
        }
        if nodes.len() >= limit {
            capped = true;
            break;
        }
        queue.pop_front();

        if let Some(deadline) = deadline {
            deadline.check()?;
        }

        // Once full, the rest of the bucket only contributes edges between
        // nodes already in the result.
        for adjacent in index.neighbors(current, direction) {
            if visited.contains(&adjacent.node) {
                edges.push(adjacent.edge);
            } else if nodes.len() < limit {
                visited.insert(adjacent.node);
                edges.push(adjacent.edge);
                nodes.push(adjacent.node);
                levels.push(level + 1);
                queue.push_back((adjacent.node, level + 1));
            } else {
                capped = true;
            }
        }
    }

    let has_more: Vec<bool> = nodes
        .iter()
        .map(|&node| {
            index
                .neighbors(node, direction)
                .iter()
                .any(|adjacent| !visited.contains(&adjacent.node))
        })
        .collect();

    // A node short of the depth bound with unvisited neighbors was cut off.
    let truncated = capped
        && levels
            .iter()
            .zip(&has_more)
            .any(|(&level, &more)| level < depth && more);

    Ok(Traversal {
        nodes,
        edges,
        has_more,
        truncated,
    })
}

impl Deadline {
    fn check(&self) -> Result<()> {
        let now = std::time::Instant::now();
        if now >= self.at {
            return Err(Error::DeadlineExceeded {
                elapsed: now.duration_since(self.started),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyType, ReferenceType, TableLevelDependency};
    use crate::store::tests::object;
    use crate::store::ObjectStore;

    /// Star: HUB feeds L1..L5, L1 feeds DEEP.
    fn star() -> (ObjectStore, DependencyIndex) {
        let store = ObjectStore::from_objects([
            object("S.HUB", false),
            object("S.L1", true),
            object("S.L2", true),
            object("S.L3", true),
            object("S.L4", true),
            object("S.L5", true),
            object("S.DEEP", true),
        ])
        .unwrap();
        let mut edges: Vec<_> = (1..=5)
            .map(|i| {
                TableLevelDependency::new(
                    "S.HUB",
                    format!("S.L{i}").as_str(),
                    DependencyType::View,
                    ReferenceType::Select,
                )
            })
            .collect();
        edges.push(TableLevelDependency::new(
            "S.L1",
            "S.DEEP",
            DependencyType::View,
            ReferenceType::Select,
        ));
        let index = DependencyIndex::build(&store, edges).unwrap();
        (store, index)
    }

    #[test]
    fn cap_keeps_closest_nodes() {
        let (store, index) = star();
        let hub = store.node_id("S.HUB").unwrap();

        let t = expand(&index, hub, Direction::Forward, 3, 3, None).unwrap();

        let names: Vec<_> = t.nodes.iter().map(|&n| store.object(n).name.as_str()).collect();
        assert_eq!(names, vec!["HUB", "L1", "L2"]);
        assert_eq!(t.edges.len(), 2);
        assert!(t.truncated);
        // HUB still has L3..L5 outside the result; L1 still has DEEP.
        assert_eq!(t.has_more, vec![true, true, false]);
    }

    #[test]
    fn cap_keeps_edges_into_kept_nodes_after_the_bucket_fills() {
        let store = ObjectStore::from_objects([
            object("S.HUB", false),
            object("S.L1", true),
            object("S.L2", true),
            object("S.L3", true),
        ])
        .unwrap();
        let edge = |to: &str, dependency_type: DependencyType| {
            TableLevelDependency::new("S.HUB", to, dependency_type, ReferenceType::Select)
        };
        let index = DependencyIndex::build(
            &store,
            vec![
                edge("S.L1", DependencyType::View),
                edge("S.L2", DependencyType::View),
                edge("S.L3", DependencyType::View),
                edge("S.L1", DependencyType::Etl),
            ],
        )
        .unwrap();
        let hub = store.node_id("S.HUB").unwrap();

        let t = expand(&index, hub, Direction::Forward, 1, 3, None).unwrap();

        let names: Vec<_> = t.nodes.iter().map(|&n| store.object(n).name.as_str()).collect();
        assert_eq!(names, vec!["HUB", "L1", "L2"]);
        // The parallel HUB -> L1 edge sits after the capping neighbor L2.
        let kept: Vec<_> = t
            .edges
            .iter()
            .map(|&e| {
                let dep = index.edge(e);
                (dep.target_id.as_str(), dep.dependency_type.as_str())
            })
            .collect();
        assert_eq!(kept, vec![("S.L1", "VIEW"), ("S.L2", "VIEW"), ("S.L1", "ETL")]);
        assert!(t.truncated);
        assert_eq!(t.has_more, vec![true, false, false]);
    }

    #[test]
    fn cap_of_one_returns_root_only() {
        let (store, index) = star();
        let hub = store.node_id("S.HUB").unwrap();

        let t = expand(&index, hub, Direction::Forward, 2, 1, None).unwrap();

        assert_eq!(t.nodes, vec![hub]);
        assert!(t.edges.is_empty());
        assert!(t.truncated);
        assert_eq!(t.has_more, vec![true]);
    }

    #[test]
    fn cap_matching_result_size_is_not_truncated() {
        let (store, index) = star();
        let hub = store.node_id("S.HUB").unwrap();

        // Depth 1 reaches HUB and L1..L5: exactly six nodes.
        let t = expand(&index, hub, Direction::Forward, 1, 6, None).unwrap();

        assert_eq!(t.nodes.len(), 6);
        assert!(!t.truncated);
        assert_eq!(t.has_more, vec![false, true, false, false, false, false]);
    }

    #[test]
    fn cap_of_one_on_isolated_root_is_not_truncated() {
        let (store, index) = star();
        let deep = store.node_id("S.DEEP").unwrap();

        let t = expand(&index, deep, Direction::Forward, 2, 1, None).unwrap();

        assert_eq!(t.nodes, vec![deep]);
        assert!(!t.truncated);
    }

    #[test]
    fn uncapped_expansion_is_not_truncated() {
        let (store, index) = star();
        let hub = store.node_id("S.HUB").unwrap();

        let t = expand(&index, hub, Direction::Forward, 10, 1000, None).unwrap();

        assert_eq!(t.nodes.len(), 7);
        assert_eq!(t.edges.len(), 6);
        assert!(!t.truncated);
        assert!(t.has_more.iter().all(|more| !more));
    }

    #[test]
    fn elapsed_deadline_aborts() {
        let (store, index) = star();
        let hub = store.node_id("S.HUB").unwrap();
        let now = std::time::Instant::now();
        let deadline = Deadline {
            started: now,
            at: now,
        };

        let err = expand(&index, hub, Direction::Forward, 2, 1000, Some(&deadline)).unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded { .. }));
    }
}
