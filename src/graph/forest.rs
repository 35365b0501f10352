//! Collapse an arbitrary node/edge collection into an ordered forest.
//!
//! Only hierarchical relations (`owns`, `implements`, `modifies`) shape the
//! tree. A node targeted by several hierarchical edges is listed once, under
//! the source of the first such edge in edge order. Nodes stranded on a pure
//! hierarchical cycle are attached by promoting one of them to a root.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::graph::model::{Graph, Node, NodeId};

/// Ordered roots plus ordered children per node.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Forest {
    pub roots: Vec<NodeId>,
    pub children: HashMap<NodeId, Vec<NodeId>>,
    parent: HashMap<NodeId, NodeId>,
}

/// Nodes whose subtree is hidden. Absence means expanded; ids that are no
/// longer in the snapshot are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<NodeId>,
}

/// One entry of the depth-first, collapse-aware walk of a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
    pub last_sibling: bool,
    /// One flag per ancestor level: `true` when that ancestor has a later
    /// sibling, so a vertical guide continues through this row.
    pub guides: Vec<bool>,
    pub has_children: bool,
    pub collapsed: bool,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn toggled(mut self, id: &str) -> Self {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
        self
    }

    pub fn collapsed(mut self, id: &str) -> Self {
        self.collapsed.insert(id.to_string());
        self
    }

    pub fn expanded(mut self, id: &str) -> Self {
        self.collapsed.remove(id);
        self
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }
}

impl Forest {
    pub fn build(graph: &Graph) -> Self {
        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();

        for edge in graph.edges.iter().filter(|e| e.is_hierarchical()) {
            if !graph.contains(&edge.from) || !graph.contains(&edge.to) {
                continue;
            }
            if parent.contains_key(&edge.to) {
                continue;
            }
            parent.insert(edge.to.clone(), edge.from.clone());
            children
                .entry(edge.from.clone())
                .or_default()
                .push(edge.to.clone());
        }

        let mut roots = graph
            .nodes
            .iter()
            .filter(|n| !parent.contains_key(&n.id))
            .map(|n| n.id.clone())
            .collect::<Vec<_>>();

        let mut reached = HashSet::new();
        for root in &roots {
            mark_reachable(root, &children, &mut reached);
        }
        loop {
            let stranded = graph
                .nodes
                .iter()
                .filter(|n| !reached.contains(n.id.as_str()))
                .min_by(|a, b| root_order(a, b));
            let Some(promoted) = stranded else {
                break;
            };
            let id = promoted.id.clone();
            if let Some(old_parent) = parent.remove(&id)
                && let Some(siblings) = children.get_mut(&old_parent)
            {
                siblings.retain(|c| *c != id);
            }
            mark_reachable(&id, &children, &mut reached);
            roots.push(id);
        }

        roots.sort_by(|a, b| match (graph.get(a), graph.get(b)) {
            (Some(a), Some(b)) => root_order(a, b),
            _ => a.cmp(b),
        });
        for list in children.values_mut() {
            list.sort_by(|a, b| match (graph.get(a), graph.get(b)) {
                (Some(a), Some(b)) => child_order(a, b),
                _ => a.cmp(b),
            });
        }
        children.retain(|_, list| !list.is_empty());

        Self {
            roots,
            children,
            parent,
        }
    }

    pub fn children_of(&self, id: &str) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: &str) -> bool {
        !self.children_of(id).is_empty()
    }

    /// The parent this node is listed under, if any.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parent.get(id).map(String::as_str)
    }

    /// Ancestors of `id` from its parent up to its root.
    pub fn ancestors(&self, id: &str) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            if out.iter().any(|a| a == parent) || parent == id {
                break;
            }
            out.push(parent.to_string());
            current = parent;
        }
        out
    }

    /// Depth-first preorder of the visible rows; descendants of collapsed
    /// nodes are skipped.
    pub fn rows(&self, collapse: &CollapseState) -> Vec<TreeRow> {
        let mut out = Vec::new();
        let mut guides = Vec::new();
        let count = self.roots.len();
        for (i, root) in self.roots.iter().enumerate() {
            self.walk(root, i + 1 == count, &mut guides, collapse, &mut out);
        }
        out
    }

    fn walk(
        &self,
        id: &str,
        last_sibling: bool,
        guides: &mut Vec<bool>,
        collapse: &CollapseState,
        out: &mut Vec<TreeRow>,
    ) {
        let kids = self.children_of(id);
        let collapsed = !kids.is_empty() && collapse.is_collapsed(id);
        out.push(TreeRow {
            id: id.to_string(),
            depth: guides.len(),
            last_sibling,
            guides: guides.clone(),
            has_children: !kids.is_empty(),
            collapsed,
        });
        if collapsed {
            return;
        }
        guides.push(!last_sibling);
        for (i, child) in kids.iter().enumerate() {
            self.walk(child, i + 1 == kids.len(), guides, collapse, out);
        }
        guides.pop();
    }
}

fn mark_reachable(
    root: &str,
    children: &HashMap<NodeId, Vec<NodeId>>,
    reached: &mut HashSet<NodeId>,
) {
    let mut stack = vec![root.to_string()];
    while let Some(id) = stack.pop() {
        if !reached.insert(id.clone()) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().cloned());
        }
    }
}

fn root_order(a: &Node, b: &Node) -> Ordering {
    a.kind
        .priority()
        .cmp(&b.kind.priority())
        .then_with(|| title_order(a, b))
}

fn child_order(a: &Node, b: &Node) -> Ordering {
    a.kind
        .priority()
        .cmp(&b.kind.priority())
        .then_with(|| a.status.priority().cmp(&b.status.priority()))
        .then_with(|| title_order(a, b))
}

fn title_order(a: &Node, b: &Node) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Edge, NodeType, Relation};

    fn node(id: &str, kind: NodeType, title: &str, status: &str) -> Node {
        Node::new(id, kind, title).with_status(status)
    }

    fn all_ids(forest: &Forest) -> Vec<String> {
        forest
            .rows(&CollapseState::new())
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn chain_builds_single_rooted_tree() {
        let mut g = Graph::new();
        g.add_node(node("c", NodeType::PullRequest, "C", "open"));
        g.add_node(node("b", NodeType::Issue, "B", "open"));
        g.add_node(node("a", NodeType::Project, "A", ""));
        g.add_edge(Edge::new("a", "b", Relation::Owns));
        g.add_edge(Edge::new("b", "c", Relation::Owns));
        let forest = Forest::build(&g);
        assert_eq!(forest.roots, vec!["a"]);
        assert_eq!(forest.children_of("a"), ["b"]);
        assert_eq!(forest.children_of("b"), ["c"]);
        assert_eq!(forest.parent_of("c"), Some("b"));
        assert_eq!(forest.ancestors("c"), vec!["b", "a"]);
    }

    #[test]
    fn roots_sort_by_type_then_title() {
        let mut g = Graph::new();
        g.add_node(node("f", NodeType::File, "alpha.rs", ""));
        g.add_node(node("i", NodeType::Issue, "Zebra", "open"));
        g.add_node(node("p2", NodeType::Project, "beta", ""));
        g.add_node(node("p1", NodeType::Project, "Alpha", ""));
        g.add_node(node("s", NodeType::Service, "gateway", ""));
        let forest = Forest::build(&g);
        assert_eq!(forest.roots, vec!["p1", "p2", "s", "i", "f"]);
    }

    #[test]
    fn children_sort_by_type_status_then_title() {
        let mut g = Graph::new();
        g.add_node(node("p", NodeType::Project, "P", ""));
        g.add_node(node("done", NodeType::Issue, "a done", "Done"));
        g.add_node(node("blocked", NodeType::Issue, "a blocked", "Blocked"));
        g.add_node(node("todo", NodeType::Issue, "b todo", "Todo"));
        g.add_node(node("active", NodeType::Issue, "z active", "In Progress"));
        g.add_node(node("odd", NodeType::Issue, "a odd", "whatever"));
        g.add_node(node("pr", NodeType::PullRequest, "a pr", "In Progress"));
        for id in ["done", "blocked", "todo", "active", "odd", "pr"] {
            g.add_edge(Edge::new("p", id, Relation::Owns));
        }
        let forest = Forest::build(&g);
        assert_eq!(
            forest.children_of("p"),
            ["active", "odd", "todo", "done", "blocked", "pr"]
        );
    }

    #[test]
    fn multi_parent_node_listed_once_under_first_parent() {
        let mut g = Graph::new();
        g.add_node(node("p1", NodeType::Project, "One", ""));
        g.add_node(node("p2", NodeType::Project, "Two", ""));
        g.add_node(node("i", NodeType::Issue, "Shared", "open"));
        g.add_edge(Edge::new("p2", "i", Relation::Owns));
        g.add_edge(Edge::new("p1", "i", Relation::Owns));
        let forest = Forest::build(&g);
        assert_eq!(forest.roots, vec!["p1", "p2"]);
        assert!(forest.children_of("p1").is_empty());
        assert_eq!(forest.children_of("p2"), ["i"]);
        assert_eq!(all_ids(&forest), vec!["p1", "p2", "i"]);
    }

    #[test]
    fn associative_edges_do_not_shape_tree() {
        let mut g = Graph::new();
        g.add_node(node("a", NodeType::Issue, "A", "open"));
        g.add_node(node("b", NodeType::Issue, "B", "open"));
        g.add_edge(Edge::new("a", "b", Relation::Blocks));
        g.add_edge(Edge::new("a", "b", Relation::ParentOf));
        let forest = Forest::build(&g);
        assert_eq!(forest.roots, vec!["a", "b"]);
        assert!(!forest.has_children("a"));
    }

    #[test]
    fn hierarchical_cycle_is_broken_and_complete() {
        let mut g = Graph::new();
        g.add_node(node("x", NodeType::Issue, "X", "open"));
        g.add_node(node("y", NodeType::Issue, "Y", "open"));
        g.add_node(node("z", NodeType::Issue, "Z", "open"));
        g.add_node(node("leaf", NodeType::File, "leaf.rs", ""));
        g.add_edge(Edge::new("x", "y", Relation::Owns));
        g.add_edge(Edge::new("y", "z", Relation::Owns));
        g.add_edge(Edge::new("z", "x", Relation::Owns));
        g.add_edge(Edge::new("z", "leaf", Relation::Modifies));
        let forest = Forest::build(&g);
        assert_eq!(forest.roots, vec!["x"]);
        assert_eq!(all_ids(&forest), vec!["x", "y", "z", "leaf"]);
        assert_eq!(forest.parent_of("x"), None);
    }

    #[test]
    fn self_loop_becomes_root() {
        let mut g = Graph::new();
        g.add_node(node("a", NodeType::Project, "A", ""));
        g.add_edge(Edge::new("a", "a", Relation::Owns));
        let forest = Forest::build(&g);
        assert_eq!(forest.roots, vec!["a"]);
        assert!(!forest.has_children("a"));
        assert!(forest.ancestors("a").is_empty());
    }

    #[test]
    fn every_node_appears_exactly_once() {
        let mut g = Graph::new();
        for i in 0..12 {
            let kind = if i % 4 == 0 {
                NodeType::Project
            } else {
                NodeType::Issue
            };
            g.add_node(node(&format!("n{i}"), kind, &format!("node {i}"), "open"));
        }
        let links = [
            (0, 1),
            (1, 2),
            (2, 1),
            (4, 5),
            (8, 5),
            (5, 6),
            (6, 4),
            (9, 10),
            (10, 9),
            (11, 11),
            (3, 99),
        ];
        for (from, to) in links {
            g.add_edge(Edge::new(format!("n{from}"), format!("n{to}"), Relation::Owns));
        }
        let forest = Forest::build(&g);
        let mut seen = all_ids(&forest);
        assert_eq!(seen.len(), g.nodes.len());
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), g.nodes.len());
    }

    #[test]
    fn build_is_deterministic_across_node_order() {
        let mut a = Graph::new();
        let mut b = Graph::new();
        let nodes = vec![
            node("p", NodeType::Project, "P", ""),
            node("i1", NodeType::Issue, "First", "open"),
            node("i2", NodeType::Issue, "Second", "In Progress"),
            node("orphan", NodeType::Commit, "abc", ""),
        ];
        for n in nodes.iter().cloned() {
            a.add_node(n);
        }
        for n in nodes.into_iter().rev() {
            b.add_node(n);
        }
        for g in [&mut a, &mut b] {
            g.add_edge(Edge::new("p", "i1", Relation::Owns));
            g.add_edge(Edge::new("p", "i2", Relation::Owns));
        }
        let fa = Forest::build(&a);
        let fb = Forest::build(&b);
        assert_eq!(fa.roots, fb.roots);
        assert_eq!(fa.children, fb.children);
        assert_eq!(fa.children_of("p"), ["i2", "i1"]);
    }

    #[test]
    fn rows_carry_guides_and_skip_collapsed() {
        let mut g = Graph::new();
        g.add_node(node("a", NodeType::Project, "A", ""));
        g.add_node(node("b", NodeType::Issue, "B", "open"));
        g.add_node(node("c", NodeType::Issue, "C", "open"));
        g.add_node(node("d", NodeType::PullRequest, "D", "open"));
        g.add_node(node("z", NodeType::Project, "Z", ""));
        g.add_edge(Edge::new("a", "b", Relation::Owns));
        g.add_edge(Edge::new("a", "c", Relation::Owns));
        g.add_edge(Edge::new("b", "d", Relation::Implements));
        let forest = Forest::build(&g);

        let rows = forest.rows(&CollapseState::new());
        let d = rows.iter().find(|r| r.id == "d").unwrap();
        assert_eq!(d.depth, 2);
        assert_eq!(d.guides, vec![true, true]);
        assert!(d.last_sibling);
        let c = rows.iter().find(|r| r.id == "c").unwrap();
        assert_eq!(c.guides, vec![true]);
        assert!(c.last_sibling);

        let collapsed = CollapseState::new().collapsed("a");
        let ids = forest
            .rows(&collapsed)
            .into_iter()
            .map(|r| r.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "z"]);
    }

    #[test]
    fn collapse_state_toggles() {
        let state = CollapseState::new().toggled("a");
        assert!(state.is_collapsed("a"));
        let state = state.toggled("a");
        assert!(!state.is_collapsed("a"));
        assert_eq!(state.len(), 0);
        assert!(!CollapseState::new().collapsed("x").expanded("x").is_collapsed("x"));
    }
}
