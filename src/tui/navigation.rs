//! Focus movement over the forest.
//!
//! Horizontal moves follow hierarchical edges; vertical moves walk the
//! visible tree order and wrap at both ends. Nothing here mutates state: every
//! function maps the current focus to the next one.

use crate::graph::forest::{CollapseState, Forest};
use crate::graph::model::{Graph, NodeId, Relation};
use crate::tui::input::Direction;

/// One row of the relationships list for the focused node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry {
    /// The node at the far end of the edge.
    pub other: NodeId,
    pub relation: Relation,
    pub outgoing: bool,
}

/// Depth-first preorder of the forest, omitting descendants of collapsed nodes.
pub fn visible_order(forest: &Forest, collapse: &CollapseState) -> Vec<NodeId> {
    forest.rows(collapse).into_iter().map(|row| row.id).collect()
}

pub fn navigate(
    focus: Option<&str>,
    direction: Direction,
    forest: &Forest,
    filtered: &Graph,
    collapse: &CollapseState,
) -> Option<NodeId> {
    let unchanged = || focus.map(str::to_string);
    match direction {
        Direction::Down => step(&visible_order(forest, collapse), focus, 1),
        Direction::Up => step(&visible_order(forest, collapse), focus, -1),
        Direction::Left => focus.and_then(|f| parent_target(f, filtered)).or_else(unchanged),
        Direction::Right => focus.and_then(|f| child_target(f, filtered)).or_else(unchanged),
    }
}

/// Move `delta` positions through `order`, wrapping at both ends. An empty
/// order leaves focus alone; a focus missing from the order lands on the
/// first entry.
pub fn step(order: &[NodeId], focus: Option<&str>, delta: isize) -> Option<NodeId> {
    if order.is_empty() {
        return focus.map(str::to_string);
    }
    let Some(pos) = focus.and_then(|f| order.iter().position(|id| id == f)) else {
        return Some(order[0].clone());
    };
    let next = (pos as isize + delta).rem_euclid(order.len() as isize) as usize;
    Some(order[next].clone())
}

/// Source of the first incoming hierarchical edge.
pub fn parent_target(focus: &str, filtered: &Graph) -> Option<NodeId> {
    filtered
        .edges
        .iter()
        .find(|e| e.is_hierarchical() && e.to == focus && filtered.contains(&e.from))
        .map(|e| e.from.clone())
}

/// Target of the first outgoing hierarchical edge.
pub fn child_target(focus: &str, filtered: &Graph) -> Option<NodeId> {
    filtered
        .edges
        .iter()
        .find(|e| e.is_hierarchical() && e.from == focus && filtered.contains(&e.to))
        .map(|e| e.to.clone())
}

/// Outgoing edges of `focus`, then incoming ones, each in edge order.
pub fn relations(focus: &str, filtered: &Graph) -> Vec<RelationEntry> {
    let outgoing = filtered
        .edges
        .iter()
        .filter(|e| e.from == focus)
        .map(|e| RelationEntry {
            other: e.to.clone(),
            relation: e.relation.clone(),
            outgoing: true,
        });
    let incoming = filtered
        .edges
        .iter()
        .filter(|e| e.to == focus)
        .map(|e| RelationEntry {
            other: e.from.clone(),
            relation: e.relation.clone(),
            outgoing: false,
        });
    outgoing.chain(incoming).collect()
}

/// Move a list selection with wraparound; the result is always in range
/// (0 for an empty list).
pub fn step_index(index: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let current = index.min(len - 1) as isize;
    (current + delta).rem_euclid(len as isize) as usize
}
