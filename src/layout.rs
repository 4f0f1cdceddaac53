//! Hierarchical layout: rank assignment, within-rank ordering, and
//! coordinate assignment for a directed (tree-like) org chart.
//!
//! Every call computes from scratch; nothing is carried over between
//! invocations, so identical input always produces identical positions.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::graph::{Direction, Edge, Node, Side};
use crate::metrics;

/// Assigns positions to all nodes for the given flow direction.
///
/// Heights are refreshed from the label and font size, handle sides are set
/// to match `direction`, and the returned positions are top-left corners.
/// Edges whose endpoints are missing from the node set are skipped;
/// disconnected nodes are placed in the first rank.
pub fn compute_layout(
    mut nodes: Vec<Node>,
    edges: &[Edge],
    direction: Direction,
    font_size: &str,
    config: &LayoutConfig,
) -> Vec<Node> {
    for node in nodes.iter_mut() {
        node.width = config.node_width;
        node.height = metrics::node_height(font_size, &node.label);
        if direction.is_horizontal() {
            node.incoming_side = Side::Left;
            node.outgoing_side = Side::Right;
        } else {
            node.incoming_side = Side::Top;
            node.outgoing_side = Side::Bottom;
        }
    }
    if nodes.is_empty() {
        return nodes;
    }

    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.clone(), idx))
        .collect();
    let node_ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();

    let mut edge_seen: HashSet<(&str, &str)> = HashSet::new();
    let layout_edges: Vec<(String, String)> = edges
        .iter()
        .filter(|edge| index.contains_key(&edge.source) && index.contains_key(&edge.target))
        .filter(|edge| edge_seen.insert((edge.source.as_str(), edge.target.as_str())))
        .map(|edge| (edge.source.clone(), edge.target.clone()))
        .collect();

    let ranks = compute_ranks(&node_ids, &layout_edges);
    let mut max_rank = 0usize;
    for rank in ranks.values() {
        max_rank = max_rank.max(*rank);
    }

    let mut rank_nodes: Vec<Vec<String>> = vec![Vec::new(); max_rank + 1];
    for id in &node_ids {
        let rank = *ranks.get(id).unwrap_or(&0);
        rank_nodes[rank].push(id.clone());
    }

    // Edges spanning more than one rank are threaded through invisible
    // dummies so the ordering passes see them at every rank they cross.
    // Dummies exist only in the rank buckets; coordinate assignment skips
    // them since they have no entry in the node index.
    let mut order_map: HashMap<String, usize> = node_ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.clone(), idx))
        .collect();
    let mut expanded_edges: Vec<(String, String)> = Vec::new();
    let mut dummy_counter = 0usize;
    for (from, to) in &layout_edges {
        let (Some(&from_rank), Some(&to_rank)) = (ranks.get(from), ranks.get(to)) else {
            continue;
        };
        if to_rank <= from_rank {
            continue;
        }
        let span = to_rank - from_rank;
        if span <= 1 {
            expanded_edges.push((from.clone(), to.clone()));
            continue;
        }
        let mut prev = from.clone();
        for step in 1..span {
            let dummy_id = format!("__dummy_{dummy_counter}__");
            dummy_counter += 1;
            order_map.insert(dummy_id.clone(), order_map.len());
            rank_nodes[from_rank + step].push(dummy_id.clone());
            expanded_edges.push((prev, dummy_id.clone()));
            prev = dummy_id;
        }
        expanded_edges.push((prev, to.clone()));
    }

    for bucket in &mut rank_nodes {
        bucket.sort_by_key(|id| order_map.get(id).copied().unwrap_or(usize::MAX));
    }
    order_rank_nodes(&mut rank_nodes, &expanded_edges, &order_map, config.order_passes);

    // Main axis: one cursor per rank, advanced by the tallest (or widest)
    // box in the rank plus the rank spacing.
    let mut main_cursor = 0.0f32;
    for bucket in &rank_nodes {
        let mut max_main = 0.0f32;
        for id in bucket {
            if let Some(&idx) = index.get(id) {
                let node = &mut nodes[idx];
                if direction.is_horizontal() {
                    node.x = main_cursor;
                    max_main = max_main.max(node.width);
                } else {
                    node.y = main_cursor;
                    max_main = max_main.max(node.height);
                }
            }
        }
        if max_main > 0.0 {
            main_cursor += max_main + config.rank_spacing;
        }
    }

    let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
    let mut outgoing: HashMap<String, Vec<String>> = HashMap::new();
    for (from, to) in &layout_edges {
        incoming.entry(to.clone()).or_default().push(from.clone());
        outgoing.entry(from.clone()).or_default().push(to.clone());
    }

    // Cross axis: sweep ranks forward against incoming neighbors and
    // backward against outgoing ones, pulling each node toward the average
    // of its neighbor centers while keeping the minimum spacing.
    let mut cross_pos: HashMap<String, f32> = HashMap::new();
    let mut place_rank = |rank_idx: usize, use_incoming: bool, nodes: &mut Vec<Node>| {
        let bucket = &rank_nodes[rank_idx];
        if bucket.is_empty() {
            return;
        }
        let neighbors = if use_incoming { &incoming } else { &outgoing };
        let mut entries: Vec<(usize, f32, f32)> = Vec::new();
        for id in bucket {
            let Some(&idx) = index.get(id) else {
                continue;
            };
            let mut sum = 0.0;
            let mut count = 0.0;
            if let Some(list) = neighbors.get(id) {
                for neighbor_id in list {
                    if let Some(center) = cross_pos.get(neighbor_id) {
                        sum += *center;
                        count += 1.0;
                    }
                }
            }
            let desired = if count > 0.0 { sum / count } else { 0.0 };
            let half = if direction.is_horizontal() {
                nodes[idx].height / 2.0
            } else {
                nodes[idx].width / 2.0
            };
            entries.push((idx, desired, half));
        }
        if entries.is_empty() {
            return;
        }
        entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        let desired_mean = entries.iter().map(|(_, d, _)| *d).sum::<f32>() / entries.len() as f32;
        let mut assigned: Vec<(usize, f32)> = Vec::new();
        let mut prev_center: Option<f32> = None;
        let mut prev_half = 0.0;
        for (idx, desired, half) in entries {
            let center = match prev_center {
                Some(prev) => desired.max(prev + prev_half + half + config.node_spacing),
                None => desired,
            };
            assigned.push((idx, center));
            prev_center = Some(center);
            prev_half = half;
        }
        let actual_mean = assigned.iter().map(|(_, c)| *c).sum::<f32>() / assigned.len() as f32;
        let delta = desired_mean - actual_mean;
        for (idx, center) in assigned {
            let center = center + delta;
            let node = &mut nodes[idx];
            if direction.is_horizontal() {
                node.y = center - node.height / 2.0;
            } else {
                node.x = center - node.width / 2.0;
            }
            cross_pos.insert(node.id.clone(), center);
        }
    };

    for _ in 0..config.order_passes.max(1) {
        for rank_idx in 0..rank_nodes.len() {
            place_rank(rank_idx, true, &mut nodes);
        }
        for rank_idx in (0..rank_nodes.len()).rev() {
            place_rank(rank_idx, false, &mut nodes);
        }
    }

    normalize_positions(&mut nodes);
    nodes
}

/// Shifts the whole chart so the top-left of its bounding box sits at the
/// origin.
fn normalize_positions(nodes: &mut [Node]) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    for node in nodes.iter() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
    }
    if min_x == f32::MAX {
        return;
    }
    for node in nodes.iter_mut() {
        node.x -= min_x;
        node.y -= min_y;
    }
}

/// Longest-path rank assignment over an ordered topological traversal.
/// Sources enter the ready heap keyed by declaration order so ties resolve
/// the same way every call; a cycle forces the earliest remaining node to
/// act as a source, treating its incoming edges as back-edges.
fn compute_ranks(node_ids: &[String], edges: &[(String, String)]) -> HashMap<String, usize> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut rev: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in edges {
        adj.entry(from.as_str()).or_default().push(to.as_str());
        rev.entry(to.as_str()).or_default().push(from.as_str());
    }

    let order_key: HashMap<&str, usize> = node_ids
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();
    let key = |id: &str| order_key.get(id).copied().unwrap_or(usize::MAX);

    let mut indeg: HashMap<&str, usize> = HashMap::new();
    for id in node_ids {
        indeg.insert(id.as_str(), rev.get(id.as_str()).map_or(0, Vec::len));
    }

    let mut ready: BinaryHeap<Reverse<(usize, &str)>> = BinaryHeap::new();
    for id in node_ids {
        if *indeg.get(id.as_str()).unwrap_or(&0) == 0 {
            ready.push(Reverse((key(id), id.as_str())));
        }
    }

    let mut order: Vec<&str> = Vec::with_capacity(node_ids.len());
    let mut processed: HashSet<&str> = HashSet::new();
    loop {
        while let Some(Reverse((_key, id))) = ready.pop() {
            if !processed.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(nexts) = adj.get(id) {
                for next in nexts {
                    if processed.contains(*next) {
                        continue;
                    }
                    if let Some(deg) = indeg.get_mut(*next) {
                        *deg = deg.saturating_sub(1);
                        if *deg == 0 {
                            ready.push(Reverse((key(next), *next)));
                        }
                    }
                }
            }
        }

        if processed.len() >= node_ids.len() {
            break;
        }

        let mut best: Option<(usize, &str)> = None;
        for id in node_ids {
            if !processed.contains(id.as_str()) {
                let k = key(id);
                if best.is_none_or(|(bk, _)| k < bk) {
                    best = Some((k, id.as_str()));
                }
            }
        }
        match best {
            Some(pick) => ready.push(Reverse(pick)),
            None => break,
        }
    }

    let order_index: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(idx, id)| (*id, idx))
        .collect();
    let mut ranks: HashMap<String, usize> = HashMap::new();
    for id in &order {
        let rank = ranks.get(*id).copied().unwrap_or(0);
        ranks.entry((*id).to_string()).or_insert(rank);
        let Some(nexts) = adj.get(*id) else {
            continue;
        };
        let from_idx = *order_index.get(*id).unwrap_or(&0);
        for next in nexts {
            let to_idx = *order_index.get(*next).unwrap_or(&from_idx);
            if to_idx <= from_idx {
                continue;
            }
            let entry = ranks.entry((*next).to_string()).or_insert(0);
            *entry = (*entry).max(rank + 1);
        }
    }

    ranks
}

/// Median-heuristic crossing reduction: alternating downward and upward
/// sweeps sort each rank by the median position of its neighbors in the
/// adjacent rank.
fn order_rank_nodes(
    rank_nodes: &mut [Vec<String>],
    edges: &[(String, String)],
    node_order: &HashMap<String, usize>,
    passes: usize,
) {
    if rank_nodes.len() <= 1 {
        return;
    }
    let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
    let mut outgoing: HashMap<String, Vec<String>> = HashMap::new();
    for (from, to) in edges {
        outgoing.entry(from.clone()).or_default().push(to.clone());
        incoming.entry(to.clone()).or_default().push(from.clone());
    }

    let mut positions: HashMap<String, usize> = HashMap::new();
    let update_positions =
        |rank_nodes: &mut [Vec<String>], positions: &mut HashMap<String, usize>| {
            positions.clear();
            for bucket in rank_nodes.iter() {
                for (idx, node_id) in bucket.iter().enumerate() {
                    positions.insert(node_id.clone(), idx);
                }
            }
        };

    update_positions(rank_nodes, &mut positions);

    let sort_bucket = |bucket: &mut Vec<String>,
                       neighbors: &HashMap<String, Vec<String>>,
                       positions: &HashMap<String, usize>| {
        let current_positions: HashMap<String, usize> = bucket
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        bucket.sort_by(|a, b| {
            let a_score = median_position(a, neighbors, positions, &current_positions);
            let b_score = median_position(b, neighbors, positions, &current_positions);
            match a_score.partial_cmp(&b_score) {
                Some(Ordering::Equal) | None => {
                    let a_pos = current_positions.get(a).copied().unwrap_or(0);
                    let b_pos = current_positions.get(b).copied().unwrap_or(0);
                    match a_pos.cmp(&b_pos) {
                        Ordering::Equal => node_order
                            .get(a)
                            .copied()
                            .unwrap_or(usize::MAX)
                            .cmp(&node_order.get(b).copied().unwrap_or(usize::MAX)),
                        other => other,
                    }
                }
                Some(ordering) => ordering,
            }
        });
    };

    for _ in 0..passes.max(1) {
        for rank in 1..rank_nodes.len() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &incoming, &positions);
            update_positions(rank_nodes, &mut positions);
        }
        for rank in (0..rank_nodes.len().saturating_sub(1)).rev() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &outgoing, &positions);
            update_positions(rank_nodes, &mut positions);
        }
    }
}

fn median_position(
    node_id: &str,
    neighbors: &HashMap<String, Vec<String>>,
    positions: &HashMap<String, usize>,
    current_positions: &HashMap<String, usize>,
) -> f32 {
    let Some(list) = neighbors.get(node_id) else {
        return *current_positions.get(node_id).unwrap_or(&0) as f32;
    };
    let mut values = Vec::new();
    for neighbor in list {
        if let Some(pos) = positions.get(neighbor) {
            values.push(*pos as f32);
        }
    }
    if values.is_empty() {
        return *current_positions.get(node_id).unwrap_or(&0) as f32;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) * 0.5
    }
}
