//! Lineage tree rendering for `lineage forward|backward|full` output.
//!
//! A query result is a node set plus the edges met while expanding it. The
//! tree shows each node once, under the node that first reached it in BFS
//! order. Every other edge into an already placed node is drawn as a leaf
//! marked `(see above)`, which is also how cycles show up.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::{self, Write};

use colored::Colorize;

use super::color::{colorize_id, colorize_type, dimmed, has_more_marker, type_icon};
use super::OutputConfig;
use crate::domain::{DatabaseObject, TableLevelDependency};
use crate::index::Direction;

/// A node in a lineage tree for rendering purposes.
#[derive(Debug, Clone)]
pub struct LineageTreeNode<'s> {
    /// The object at this position.
    pub object: &'s DatabaseObject,
    /// Edge linking this node to its parent (`None` for the root).
    pub via: Option<&'s TableLevelDependency>,
    /// Lineage continues past the result from here.
    pub has_more: bool,
    /// The object is shown in full elsewhere in the tree.
    pub repeated: bool,
    /// Children in edge discovery order.
    pub children: Vec<LineageTreeNode<'s>>,
}

/// Arrange a query result as a tree hanging off `root`.
///
/// `direction` says which edge end is the child: the consumer for
/// [`Direction::Forward`], the provider for [`Direction::Backward`]. Edges
/// whose ends are not in `nodes` are ignored.
#[must_use]
pub fn build_lineage_tree<'s>(
    root: &'s DatabaseObject,
    nodes: &[&'s DatabaseObject],
    edges: &[&'s TableLevelDependency],
    direction: Direction,
    has_more: &BTreeMap<&str, bool>,
) -> LineageTreeNode<'s> {
    let objects: HashMap<&str, &'s DatabaseObject> =
        nodes.iter().map(|object| (object.id.as_str(), *object)).collect();

    let mut outgoing: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        let (near, far) = ends(*edge, direction);
        if objects.contains_key(near) && objects.contains_key(far) {
            outgoing.entry(near).or_default().push(i);
        }
    }

    // BFS over the result edges picks the edge that places each node.
    let mut placed_by: HashMap<&str, Option<usize>> = HashMap::from([(root.id.as_str(), None)]);
    let mut queue = VecDeque::from([root.id.as_str()]);
    while let Some(current) = queue.pop_front() {
        for &i in outgoing.get(current).map(Vec::as_slice).unwrap_or_default() {
            let (_, far) = ends(edges[i], direction);
            if !placed_by.contains_key(far) {
                placed_by.insert(far, Some(i));
                queue.push_back(far);
            }
        }
    }

    let builder = TreeBuilder {
        objects: &objects,
        edges,
        outgoing: &outgoing,
        placed_by: &placed_by,
        direction,
        has_more,
    };
    builder.node(root, None)
}

fn ends(edge: &TableLevelDependency, direction: Direction) -> (&str, &str) {
    match direction {
        Direction::Forward => (edge.source_id.as_str(), edge.target_id.as_str()),
        Direction::Backward => (edge.target_id.as_str(), edge.source_id.as_str()),
    }
}

struct TreeBuilder<'a, 's> {
    objects: &'a HashMap<&'s str, &'s DatabaseObject>,
    edges: &'a [&'s TableLevelDependency],
    outgoing: &'a HashMap<&'s str, Vec<usize>>,
    placed_by: &'a HashMap<&'s str, Option<usize>>,
    direction: Direction,
    has_more: &'a BTreeMap<&'a str, bool>,
}

impl<'s> TreeBuilder<'_, 's> {
    fn node(&self, object: &'s DatabaseObject, via: Option<usize>) -> LineageTreeNode<'s> {
        let id = object.id.as_str();
        let children = self
            .outgoing
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|&i| {
                let (_, far) = ends(self.edges[i], self.direction);
                let child = *self.objects.get(far)?;
                if self.placed_by.get(far) == Some(&Some(i)) {
                    Some(self.node(child, Some(i)))
                } else {
                    Some(self.leaf(child, i))
                }
            })
            .collect();

        LineageTreeNode {
            object,
            via: via.map(|i| self.edges[i]),
            has_more: self.has_more.get(id).copied().unwrap_or(false),
            repeated: false,
            children,
        }
    }

    fn leaf(&self, object: &'s DatabaseObject, via: usize) -> LineageTreeNode<'s> {
        LineageTreeNode {
            object,
            via: Some(self.edges[via]),
            has_more: false,
            repeated: true,
            children: Vec::new(),
        }
    }
}

/// Render a lineage tree with ASCII/Unicode connectors.
///
/// Renders a tree like:
/// ```text
/// ▦ STAGE.ORDERS TABLE
/// ├── ◇ DWH.V_ORDERS VIEW (VIEW/SELECT)
/// │   └── ▦ MART.ORDERS TABLE (ETL/INSERT_SELECT) …
/// └── ◇ DWH.V_LATE VIEW (VIEW/SELECT)
/// ```
pub fn write_lineage_tree<W: Write>(
    w: &mut W,
    root: &LineageTreeNode<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    let root_icon = type_icon(root.object.object_type(), config);
    let root_icon = if config.use_colors {
        root_icon.cyan().bold().to_string()
    } else {
        root_icon.to_string()
    };

    writeln!(
        w,
        "{} {} {}{}",
        root_icon,
        colorize_id(root.object.id.as_str(), config),
        colorize_type(root.object.object_type(), config),
        more_suffix(root, config)
    )?;

    write_children(w, &root.children, &mut Vec::new(), config)
}

/// Recursively render tree children with proper connector lines.
///
/// `prefix_segments` tracks which ancestor levels still have siblings below,
/// used to draw the vertical continuation lines (`│`).
fn write_children<W: Write>(
    w: &mut W,
    children: &[LineageTreeNode<'_>],
    prefix_segments: &mut Vec<bool>,
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();

        let mut prefix = String::new();
        for &continues in prefix_segments.iter() {
            prefix.push_str(&dimmed(if continues { pipe } else { space }, config));
        }
        let connector = dimmed(if is_last { corner } else { branch }, config);

        let label = child
            .via
            .map(|edge| {
                dimmed(
                    &format!(" ({}/{})", edge.dependency_type, edge.reference_type),
                    config,
                )
            })
            .unwrap_or_default();
        let repeated = if child.repeated {
            dimmed(" (see above)", config)
        } else {
            String::new()
        };

        writeln!(
            w,
            "{}{}{} {} {}{}{}{}",
            prefix,
            connector,
            type_icon(child.object.object_type(), config),
            colorize_id(child.object.id.as_str(), config),
            colorize_type(child.object.object_type(), config),
            label,
            repeated,
            more_suffix(child, config)
        )?;

        if !child.children.is_empty() {
            prefix_segments.push(!is_last);
            write_children(w, &child.children, prefix_segments, config)?;
            prefix_segments.pop();
        }
    }

    Ok(())
}

fn more_suffix(node: &LineageTreeNode<'_>, config: &OutputConfig) -> String {
    if node.has_more {
        format!(" {}", has_more_marker(config))
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyType, ReferenceType};
    use crate::store::tests::object;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, false, false)
    }

    fn edge(from: &str, to: &str) -> TableLevelDependency {
        TableLevelDependency::new(from, to, DependencyType::View, ReferenceType::Select)
    }

    fn render(tree: &LineageTreeNode<'_>, config: &OutputConfig) -> String {
        let mut out = Vec::new();
        write_lineage_tree(&mut out, tree, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn single_root_no_children() {
        let root = object("S.ROOT", false);
        let tree = build_lineage_tree(&root, &[&root], &[], Direction::Forward, &BTreeMap::new());

        assert!(tree.children.is_empty());
        assert_eq!(render(&tree, &plain()), "▦ S.ROOT TABLE\n");
    }

    #[test]
    fn forward_tree_with_connectors() {
        let (a, b, c, d) = (
            object("S.A", false),
            object("S.B", true),
            object("S.C", false),
            object("S.D", true),
        );
        let edges = [edge("S.A", "S.B"), edge("S.B", "S.C"), edge("S.A", "S.D")];
        let edge_refs: Vec<&TableLevelDependency> = edges.iter().collect();
        let has_more = BTreeMap::from([("S.A", false), ("S.B", false), ("S.C", true), ("S.D", false)]);

        let tree =
            build_lineage_tree(&a, &[&a, &b, &d, &c], &edge_refs, Direction::Forward, &has_more);
        let text = render(&tree, &plain());

        assert_eq!(
            text,
            "▦ S.A TABLE\n\
             ├── ◇ S.B VIEW (VIEW/SELECT)\n\
             │   └── ▦ S.C TABLE (VIEW/SELECT) …\n\
             └── ◇ S.D VIEW (VIEW/SELECT)\n"
        );
    }

    #[test]
    fn backward_tree_follows_providers() {
        let (a, b) = (object("S.A", false), object("S.B", true));
        let edges = [edge("S.A", "S.B")];
        let edge_refs: Vec<&TableLevelDependency> = edges.iter().collect();

        let tree =
            build_lineage_tree(&b, &[&b, &a], &edge_refs, Direction::Backward, &BTreeMap::new());

        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].object.id.as_str(), "S.A");
    }

    #[test]
    fn second_path_is_marked_repeated() {
        // Diamond: A feeds B and C, both feed D.
        let (a, b, c, d) = (
            object("S.A", false),
            object("S.B", false),
            object("S.C", false),
            object("S.D", false),
        );
        let edges = [
            edge("S.A", "S.B"),
            edge("S.A", "S.C"),
            edge("S.B", "S.D"),
            edge("S.C", "S.D"),
        ];
        let edge_refs: Vec<&TableLevelDependency> = edges.iter().collect();

        let tree = build_lineage_tree(
            &a,
            &[&a, &b, &c, &d],
            &edge_refs,
            Direction::Forward,
            &BTreeMap::new(),
        );

        let under_b = &tree.children[0].children[0];
        let under_c = &tree.children[1].children[0];
        assert!(!under_b.repeated);
        assert!(under_c.repeated);
        assert!(render(&tree, &plain()).contains("S.D TABLE (VIEW/SELECT) (see above)"));
    }

    #[test]
    fn cycle_back_to_root_terminates() {
        let (a, b) = (object("S.A", false), object("S.B", false));
        let edges = [edge("S.A", "S.B"), edge("S.B", "S.A")];
        let edge_refs: Vec<&TableLevelDependency> = edges.iter().collect();

        let tree =
            build_lineage_tree(&a, &[&a, &b], &edge_refs, Direction::Forward, &BTreeMap::new());

        let back = &tree.children[0].children[0];
        assert_eq!(back.object.id.as_str(), "S.A");
        assert!(back.repeated);
        assert!(back.children.is_empty());
    }

    #[test]
    fn ascii_connectors() {
        let (a, b, c) = (object("S.A", false), object("S.B", false), object("S.C", false));
        let edges = [edge("S.A", "S.B"), edge("S.A", "S.C")];
        let edge_refs: Vec<&TableLevelDependency> = edges.iter().collect();
        let tree = build_lineage_tree(
            &a,
            &[&a, &b, &c],
            &edge_refs,
            Direction::Forward,
            &BTreeMap::new(),
        );

        let text = render(&tree, &OutputConfig::new(80, true, false));
        assert!(text.contains("|-- # S.B"));
        assert!(text.contains("`-- # S.C"));
        assert!(text.is_ascii());
    }
}
