use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry and resolver knobs for the layout engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Uniform box width shared by every node.
    pub node_width: f32,
    /// Minimum gap between node boxes within a rank.
    pub node_spacing: f32,
    /// Gap between consecutive ranks along the flow direction.
    pub rank_spacing: f32,
    /// Buffer added to bounding boxes before the collision test.
    pub clearance: f32,
    /// Pass budget for the overlap resolver.
    pub resolve_iterations: usize,
    /// Displacement scale applied per colliding pair per pass.
    pub resolve_step: f32,
    /// Sweep count for within-rank ordering and cross-axis placement.
    pub order_passes: usize,
    /// Span of the random offset applied to freshly added nodes.
    pub spawn_jitter: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 400.0,
            node_spacing: 180.0,
            rank_spacing: 190.0,
            clearance: 20.0,
            resolve_iterations: 100,
            resolve_step: 5.0,
            order_passes: 2,
            spawn_jitter: 100.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    clearance: Option<f32>,
    resolve_iterations: Option<usize>,
    resolve_step: Option<f32>,
    order_passes: Option<usize>,
    spawn_jitter: Option<f32>,
}

/// Loads a partial override file on top of the defaults. `None` yields the
/// defaults unchanged.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: LayoutConfigFile = serde_json::from_str(&contents)?;

    if let Some(v) = parsed.node_width {
        config.node_width = v;
    }
    if let Some(v) = parsed.node_spacing {
        config.node_spacing = v;
    }
    if let Some(v) = parsed.rank_spacing {
        config.rank_spacing = v;
    }
    if let Some(v) = parsed.clearance {
        config.clearance = v;
    }
    if let Some(v) = parsed.resolve_iterations {
        config.resolve_iterations = v;
    }
    if let Some(v) = parsed.resolve_step {
        config.resolve_step = v;
    }
    if let Some(v) = parsed.order_passes {
        config.order_passes = v;
    }
    if let Some(v) = parsed.spawn_jitter {
        config.spawn_jitter = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = LayoutConfig::default();
        assert_eq!(config.node_width, 400.0);
        assert_eq!(config.node_spacing, 180.0);
        assert_eq!(config.rank_spacing, 190.0);
        assert_eq!(config.clearance, 20.0);
        assert_eq!(config.resolve_iterations, 100);
        assert_eq!(config.resolve_step, 5.0);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.rank_spacing, LayoutConfig::default().rank_spacing);
    }

    #[test]
    fn partial_override_file_keeps_other_defaults() {
        let path = std::env::temp_dir().join("orgchart_layout_config_partial.json");
        std::fs::write(&path, r#"{ "node_spacing": 120.0, "resolve_step": 2.5 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.node_spacing, 120.0);
        assert_eq!(config.resolve_step, 2.5);
        assert_eq!(config.node_width, 400.0);
        assert_eq!(config.rank_spacing, 190.0);
    }

    #[test]
    fn unreadable_or_invalid_files_are_errors() {
        let missing = std::env::temp_dir().join("orgchart_layout_config_missing.json");
        let _ = std::fs::remove_file(&missing);
        assert!(load_config(Some(&missing)).is_err());

        let path = std::env::temp_dir().join("orgchart_layout_config_invalid.json");
        std::fs::write(&path, "{ node_spacing: }").unwrap();
        let result = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = LayoutConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: LayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resolve_iterations, config.resolve_iterations);
        assert_eq!(back.spawn_jitter, config.spawn_jitter);
    }
}
