//! Structural analysis of a generation's dependency graph.

use crate::domain::ObjectId;
use crate::snapshot::Snapshot;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};

/// Groups of objects that depend on each other in a loop.
///
/// Each group is a strongly connected component with more than one object,
/// or a single object with an edge to itself. Members are sorted by id and
/// groups by their first member.
#[must_use]
pub fn dependency_cycles(snapshot: &Snapshot) -> Vec<Vec<&ObjectId>> {
    let store = snapshot.store();
    let index = snapshot.index();

    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(store.len(), index.edge_count());
    for _ in 0..store.len() {
        graph.add_node(());
    }
    for (from, to) in index.endpoint_pairs() {
        graph.add_edge(NodeIndex::new(from.index()), NodeIndex::new(to.index()), ());
    }

    let objects = store.all();
    let mut cycles: Vec<Vec<&ObjectId>> = algo::tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            _ => true,
        })
        .map(|component| {
            let mut members: Vec<&ObjectId> = component
                .into_iter()
                .map(|node| &objects[node.index()].id)
                .collect();
            members.sort();
            members
        })
        .collect();

    cycles.sort();
    tracing::debug!(cycles = cycles.len(), "Dependency cycle scan");
    cycles
}
