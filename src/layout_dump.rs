//! JSON geometry dump for debugging and downstream renderers.

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::chart::OrgChart;
use crate::graph::Direction;

#[derive(Debug, Serialize)]
pub struct ChartDump {
    pub direction: String,
    pub font_size: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_lines: Vec<String>,
    pub is_new: bool,
    pub job_titles: Vec<String>,
    pub division_count: u32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl ChartDump {
    pub fn from_chart(chart: &OrgChart) -> Self {
        let direction = match chart.direction() {
            Direction::TopToBottom => "TB".to_string(),
            Direction::LeftToRight => "LR".to_string(),
        };

        let nodes = chart
            .nodes()
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                label_lines: node.label.split('\n').map(str::to_string).collect(),
                is_new: node.is_new(),
                job_titles: node.payload.job_titles.clone(),
                division_count: node.payload.division_count,
            })
            .collect();

        let edges = chart
            .edges()
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect();

        ChartDump {
            direction,
            font_size: chart.font_size().to_string(),
            nodes,
            edges,
        }
    }
}

pub fn write_chart_dump(path: &Path, chart: &OrgChart) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = ChartDump::from_chart(chart);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
