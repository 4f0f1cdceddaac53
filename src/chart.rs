//! Editor-facing chart state and the event pipeline around the engine.
//!
//! Every operation runs to completion on the caller's thread and swaps in a
//! freshly built node collection, so renderers never observe a half-updated
//! snapshot.

use once_cell::sync::Lazy;
use std::sync::Mutex;

use crate::config::LayoutConfig;
use crate::graph::{Direction, Edge, Node, NodePayload};
use crate::{layout, metrics, overlap, subtree};

static SPAWN_STATE: Lazy<Mutex<u64>> = Lazy::new(|| Mutex::new(0x9E37_79B9_7F4A_7C15));

/// Pseudo-random offset in `[0, span)` for each axis, so stacked new nodes
/// don't land exactly on top of each other.
fn spawn_jitter(span: f32) -> (f32, f32) {
    let mut state = SPAWN_STATE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut next = || {
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (*state >> 40) as f32 / (1u64 << 24) as f32
    };
    let x = next() * span;
    let y = next() * span;
    (x, y)
}

/// A mutable org chart: node and edge collections plus the active direction
/// and font size, with the event wiring between the layout engine, the
/// overlap resolver, and the subtree translator.
pub struct OrgChart {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    direction: Direction,
    font_size: String,
    config: LayoutConfig,
}

impl OrgChart {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            direction: Direction::TopToBottom,
            font_size: "14px".to_string(),
            config,
        }
    }

    /// Builds a chart from existing collections and runs a full layout and
    /// resolve pass over them.
    pub fn with_elements(nodes: Vec<Node>, edges: Vec<Edge>, config: LayoutConfig) -> Self {
        let mut chart = Self::new(config);
        chart.nodes = nodes;
        chart.edges = edges;
        chart.relayout();
        chart
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn font_size(&self) -> &str {
        &self.font_size
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Adds an unconnected node near the origin. The newcomer is exempt from
    /// overlap nudging until it is connected, but existing nodes still get a
    /// resolve pass so the chart stays readable. No layout pass runs here.
    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>, payload: NodePayload) {
        let mut node = Node::new(id, label, self.config.node_width);
        let (x, y) = spawn_jitter(self.config.spawn_jitter);
        node.x = x;
        node.y = y;
        node.payload = payload;
        self.nodes.push(node);
        self.resolve();
    }

    /// Connects parent to child. Both endpoints leave the `Unconnected`
    /// state permanently; positions are not touched until the next layout or
    /// drag event.
    pub fn connect(
        &mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) {
        let edge = Edge::new(edge_id, source, target);
        for node in self.nodes.iter_mut() {
            if node.id == edge.source || node.id == edge.target {
                node.connectivity.mark_connected();
            }
        }
        self.edges.push(edge);
    }

    /// Rewrites a node's label and refreshes its height estimate in place.
    pub fn set_label(&mut self, id: &str, label: impl Into<String>) {
        let label = label.into();
        for node in self.nodes.iter_mut() {
            if node.id == id {
                node.height = metrics::node_height(&self.font_size, &label);
                node.label = label;
                break;
            }
        }
    }

    /// Applies a clamped font size and reruns the full pipeline, since every
    /// node's height changes.
    pub fn set_font_size(&mut self, raw: impl Into<String>) {
        self.font_size = clamp_font_size(raw.into());
        self.relayout();
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.relayout();
    }

    /// Full hierarchical layout followed by overlap resolution.
    pub fn relayout(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        let placed = layout::compute_layout(
            nodes,
            &self.edges,
            self.direction,
            &self.font_size,
            &self.config,
        );
        self.nodes = overlap::resolve_overlaps(placed, &self.edges, &self.config);
    }

    /// Live drag feedback: moves the node by the incremental delta and keeps
    /// its subtree rigid underneath it. No overlap resolution here.
    pub fn drag_move(&mut self, id: &str, dx: f32, dy: f32) {
        let mut found = false;
        for node in self.nodes.iter_mut() {
            if node.id == id {
                node.x += dx;
                node.y += dy;
                found = true;
                break;
            }
        }
        if !found {
            return;
        }
        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = subtree::translate_subtree(id, dx, dy, nodes, &self.edges);
    }

    /// Drag release: resolves overlaps across the whole chart, unless the
    /// dragged node is still unconnected (it must stay where the user left
    /// it until it is wired in).
    pub fn drag_stop(&mut self, id: &str) {
        let dragged_is_new = self
            .nodes
            .iter()
            .any(|node| node.id == id && node.is_new());
        if dragged_is_new {
            return;
        }
        self.resolve();
    }

    fn resolve(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = overlap::resolve_overlaps(nodes, &self.edges, &self.config);
    }
}

/// Mirrors the editor's font-size input guard: values above 36 fall back to
/// 18px, values below 1 to 1px; anything unparsable passes through and
/// degrades to the base line height in the estimator.
fn clamp_font_size(raw: String) -> String {
    match metrics::parse_font_size(&raw) {
        Some(size) if size > 36.0 => "18px".to_string(),
        Some(size) if size < 1.0 => "1px".to_string(),
        _ => raw,
    }
}
