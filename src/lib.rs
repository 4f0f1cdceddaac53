pub mod chart;
pub mod config;
pub mod graph;
pub mod layout;
pub mod layout_dump;
pub mod metrics;
pub mod overlap;
pub mod subtree;

pub use chart::OrgChart;
pub use config::{LayoutConfig, load_config};
pub use graph::{Connectivity, Direction, Edge, Node, NodePayload, Side};
pub use layout::compute_layout;
pub use metrics::node_height;
pub use overlap::{resolve_overlaps, resolve_overlaps_with};
pub use subtree::{descendants_of, is_ancestor, translate_subtree};
