use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use orgchart_layout::{
    Connectivity, Direction, Edge, LayoutConfig, Node, compute_layout, resolve_overlaps,
};

/// Complete binary hierarchy with multi-line labels, the shape a grown org
/// chart takes in practice.
fn synthetic_chart(size: usize) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::with_capacity(size);
    let mut edges = Vec::with_capacity(size.saturating_sub(1));
    for i in 0..size {
        let label = if i % 3 == 0 {
            format!("Division {i}\nRegional Office")
        } else {
            format!("Division {i}")
        };
        let mut node = Node::new(format!("n{i}"), label, 400.0);
        node.connectivity = Connectivity::Connected;
        nodes.push(node);
        if i > 0 {
            let parent = (i - 1) / 2;
            edges.push(Edge::new(format!("e{i}"), format!("n{parent}"), format!("n{i}")));
        }
    }
    (nodes, edges)
}

/// Clustered leaves with no hierarchy, the worst case for the resolver.
fn colliding_leaves(size: usize) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(size);
    for i in 0..size {
        let mut node = Node::new(format!("n{i}"), format!("Division {i}"), 400.0);
        node.connectivity = Connectivity::Connected;
        node.x = (i % 8) as f32 * 30.0;
        node.y = (i / 8) as f32 * 25.0;
        node.height = 72.0;
        nodes.push(node);
    }
    nodes
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    for size in [16usize, 64, 256] {
        let (nodes, edges) = synthetic_chart(size);
        c.bench_function(&format!("layout/{size}"), |b| {
            b.iter(|| {
                compute_layout(
                    black_box(nodes.clone()),
                    black_box(&edges),
                    Direction::TopToBottom,
                    "14px",
                    &config,
                )
            })
        });
    }
}

fn bench_resolve(c: &mut Criterion) {
    let config = LayoutConfig::default();
    for size in [16usize, 64] {
        let nodes = colliding_leaves(size);
        c.bench_function(&format!("resolve/{size}"), |b| {
            b.iter(|| resolve_overlaps(black_box(nodes.clone()), &[], &config))
        });
    }
}

criterion_group!(benches, bench_layout, bench_resolve);
criterion_main!(benches);
