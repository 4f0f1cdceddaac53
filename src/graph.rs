use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopToBottom,
    LeftToRight,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight)
    }
}

/// Which edge of a node's box an edge attaches to. Set by the layout engine
/// to match the active flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Per-node connection state. A node starts `Unconnected` and becomes
/// `Connected` the first time any edge references it; `Connected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Unconnected,
    Connected,
}

impl Connectivity {
    pub fn is_new(self) -> bool {
        matches!(self, Self::Unconnected)
    }

    pub fn mark_connected(&mut self) {
        *self = Self::Connected;
    }
}

/// Editor-facing node content the layout engine carries through untouched.
#[derive(Debug, Clone, Default)]
pub struct NodePayload {
    pub job_titles: Vec<String>,
    pub division_count: u32,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Top-left corner of the node's box.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: String,
    pub connectivity: Connectivity,
    pub payload: NodePayload,
    pub incoming_side: Side,
    pub outgoing_side: Side,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, width: f32) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width,
            height: 0.0,
            label: label.into(),
            connectivity: Connectivity::Unconnected,
            payload: NodePayload::default(),
            incoming_side: Side::Top,
            outgoing_side: Side::Bottom,
        }
    }

    pub fn is_new(&self) -> bool {
        self.connectivity.is_new()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Directed structural edge; source -> target reads parent -> child.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ids of every node with at least one outgoing edge. Those nodes own their
/// position via the hierarchical layout and are exempt from overlap nudging.
pub fn parent_ids(edges: &[Edge]) -> HashSet<&str> {
    edges.iter().map(|edge| edge.source.as_str()).collect()
}

pub fn find_node<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    nodes.iter().find(|node| node.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_transition_is_terminal() {
        let mut state = Connectivity::Unconnected;
        assert!(state.is_new());
        state.mark_connected();
        assert!(!state.is_new());
        state.mark_connected();
        assert_eq!(state, Connectivity::Connected);
    }

    #[test]
    fn parent_ids_tracks_outgoing_edges_only() {
        let edges = vec![Edge::new("e1", "a", "b"), Edge::new("e2", "a", "c")];
        let parents = parent_ids(&edges);
        assert!(parents.contains("a"));
        assert!(!parents.contains("b"));
        assert!(!parents.contains("c"));
    }
}
