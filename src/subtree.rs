//! Ancestry queries and rigid subtree translation.
//!
//! The edge set is assumed to be a forest, but every traversal here runs an
//! explicit stack with a visited set so shared children and accidental cycles
//! terminate instead of recursing forever.

use std::collections::{HashMap, HashSet};

use crate::graph::{Edge, Node};

/// Every node reachable from `root_id` along source -> target edges. The
/// root itself is not included. Each node appears once even when it is
/// reachable through multiple paths.
pub fn descendants_of(root_id: &str, edges: &[Edge]) -> HashSet<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![root_id];
    while let Some(current) = stack.pop() {
        let Some(next) = children.get(current) else {
            continue;
        };
        for child in next {
            if visited.insert(child) {
                stack.push(child);
            }
        }
    }

    visited.remove(root_id);
    visited.into_iter().map(str::to_string).collect()
}

pub fn is_ancestor(root_id: &str, candidate_id: &str, edges: &[Edge]) -> bool {
    if root_id == candidate_id {
        return false;
    }
    descendants_of(root_id, edges).contains(candidate_id)
}

/// Applies a drag delta to every descendant of `root_id`, keeping the dragged
/// subtree rigid. The root is expected to carry its new position already;
/// non-descendants are left untouched. Each descendant shifts exactly once,
/// including nodes reachable through more than one parent.
pub fn translate_subtree(
    root_id: &str,
    dx: f32,
    dy: f32,
    mut nodes: Vec<Node>,
    edges: &[Edge],
) -> Vec<Node> {
    let moved = descendants_of(root_id, edges);
    for node in nodes.iter_mut() {
        if node.id != root_id && moved.contains(&node.id) {
            node.x += dx;
            node.y += dy;
        }
    }
    nodes
}
