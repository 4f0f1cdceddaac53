//! Iterative overlap resolution.
//!
//! A relaxation pass, not exact placement: colliding leaf pairs are nudged
//! apart a little per iteration until a full pass finds no collision or the
//! iteration budget runs out. Residual overlap after the budget is accepted
//! silently.

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::graph::{Edge, Node, parent_ids};

/// Axis-aligned collision test with the clearance margin applied once per
/// axis, each node contributing its own height.
pub fn nodes_overlap(a: &Node, b: &Node, config: &LayoutConfig) -> bool {
    let width = config.node_width;
    let margin = config.clearance;
    !(a.x + width + margin < b.x
        || a.x > b.x + width + margin
        || a.y + a.height + margin < b.y
        || a.y > b.y + b.height + margin)
}

/// Resolves overlaps with the configured iteration budget and step.
pub fn resolve_overlaps(nodes: Vec<Node>, edges: &[Edge], config: &LayoutConfig) -> Vec<Node> {
    resolve_overlaps_with(
        nodes,
        edges,
        config.resolve_iterations,
        config.resolve_step,
        config,
    )
}

/// Pairs are eligible only when both nodes are connected (not `is_new`) and
/// neither has an outgoing edge: parents are owned by the hierarchical
/// layout, and brand-new nodes must stay where the user dropped them until
/// they are wired in.
pub fn resolve_overlaps_with(
    mut nodes: Vec<Node>,
    edges: &[Edge],
    iterations: usize,
    step: f32,
    config: &LayoutConfig,
) -> Vec<Node> {
    let parents: HashSet<&str> = parent_ids(edges);
    let exempt: Vec<bool> = nodes
        .iter()
        .map(|node| node.is_new() || parents.contains(node.id.as_str()))
        .collect();

    for _ in 0..iterations {
        let mut resolved = true;

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if exempt[i] || exempt[j] {
                    continue;
                }
                if !nodes_overlap(&nodes[i], &nodes[j], config) {
                    continue;
                }
                resolved = false;

                let dx = nodes[j].x - nodes[i].x;
                let dy = nodes[j].y - nodes[i].y;
                let distance = (dx * dx + dy * dy).sqrt();
                let min_dist_x = config.node_width + config.clearance;
                let min_dist_y = nodes[i].height + nodes[j].height + config.clearance;
                let min_dist = (min_dist_x * min_dist_x + min_dist_y * min_dist_y).sqrt();

                if distance < min_dist {
                    let move_distance = step * (min_dist - distance) / min_dist;
                    let angle = dy.atan2(dx);
                    let move_x = angle.cos() * move_distance;
                    let move_y = angle.sin() * move_distance;

                    nodes[i].x -= move_x;
                    nodes[i].y -= move_y;
                    nodes[j].x += move_x;
                    nodes[j].y += move_y;
                }
            }
        }

        if resolved {
            break;
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connectivity, Edge, Node};

    fn leaf(id: &str, x: f32, y: f32, height: f32) -> Node {
        let mut node = Node::new(id, id, 400.0);
        node.x = x;
        node.y = y;
        node.height = height;
        node.connectivity = Connectivity::Connected;
        node
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        let config = LayoutConfig::default();
        let a = leaf("a", 0.0, 0.0, 50.0);
        let b = leaf("b", 430.0, 0.0, 50.0);
        assert!(!nodes_overlap(&a, &b, &config));
        let c = leaf("c", 200.0, 0.0, 50.0);
        assert!(nodes_overlap(&a, &c, &config));
    }

    #[test]
    fn heavily_overlapping_leaves_separate_within_budget() {
        let config = LayoutConfig::default();
        // Tall boxes 10 units apart; both connected leaves, no edges.
        let nodes = vec![leaf("a", 0.0, 0.0, 180.0), leaf("b", 10.0, 0.0, 180.0)];
        let resolved = resolve_overlaps(nodes, &[], &config);
        assert!(!nodes_overlap(&resolved[0], &resolved[1], &config));
    }

    #[test]
    fn new_node_is_never_moved() {
        let config = LayoutConfig::default();
        let mut fresh = leaf("fresh", 5.0, 5.0, 50.0);
        fresh.connectivity = Connectivity::Unconnected;
        let settled = leaf("settled", 0.0, 0.0, 50.0);
        let resolved = resolve_overlaps(vec![fresh, settled], &[], &config);
        let fresh = resolved.iter().find(|n| n.id == "fresh").unwrap();
        let settled = resolved.iter().find(|n| n.id == "settled").unwrap();
        assert_eq!((fresh.x, fresh.y), (5.0, 5.0));
        assert_eq!((settled.x, settled.y), (0.0, 0.0));
    }

    #[test]
    fn parents_are_never_moved() {
        let config = LayoutConfig::default();
        let edges = vec![Edge::new("e1", "boss", "report")];
        let boss = leaf("boss", 0.0, 0.0, 50.0);
        let peer = leaf("peer", 10.0, 10.0, 50.0);
        let resolved = resolve_overlaps(vec![boss, peer], &edges, &config);
        let boss = resolved.iter().find(|n| n.id == "boss").unwrap();
        let peer = resolved.iter().find(|n| n.id == "peer").unwrap();
        assert_eq!((boss.x, boss.y), (0.0, 0.0));
        assert_eq!((peer.x, peer.y), (10.0, 10.0));
    }

    #[test]
    fn idempotent_on_separated_set() {
        let config = LayoutConfig::default();
        let nodes = vec![leaf("a", 0.0, 0.0, 180.0), leaf("b", 10.0, 0.0, 180.0)];
        let once = resolve_overlaps(nodes, &[], &config);
        let positions: Vec<(f32, f32)> = once.iter().map(|n| (n.x, n.y)).collect();
        let twice = resolve_overlaps(once, &[], &config);
        let again: Vec<(f32, f32)> = twice.iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(positions, again);
    }

    #[test]
    fn budget_exhaustion_returns_best_effort() {
        let config = LayoutConfig::default();
        let nodes = vec![leaf("a", 0.0, 0.0, 50.0), leaf("b", 1.0, 0.0, 50.0)];
        // One pass cannot separate boxes this close; no panic, positions move.
        let resolved = resolve_overlaps_with(nodes, &[], 1, 5.0, &config);
        assert!(resolved[0].x < 0.0);
        assert!(resolved[1].x > 1.0);
    }
}
