//! Static scene shared by every frame
//!
//! Frames only carry what changes per step. Node geometry, edges, the legend
//! and overlay colors are written once as a scene descriptor. Positions are
//! left in graph coordinates; projecting them is up to the renderer.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use transit_core::{BoundingBox, Graph, NodeId, Position};

use crate::color::Color;
use crate::export::ExportError;
use crate::style::{FrameStyle, LegendEntry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub key: String,
    pub label: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

/// Everything about the drawing that does not change between steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub bounds: Option<BoundingBox>,
    pub legend: Vec<LegendEntry>,
    pub path_color: Color,
    pub route_color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<NodeId>,
}

impl SceneDescriptor {
    pub fn from_graph(graph: &Graph, style: &FrameStyle) -> Self {
        let nodes: Vec<_> = graph
            .nodes()
            .map(|(id, data)| SceneNode {
                id,
                key: data.key.clone(),
                label: data.label.clone(),
                position: data.position,
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| SceneEdge {
                source: edge.source,
                target: edge.target,
                label: edge.label.clone(),
            })
            .collect();

        Self {
            nodes,
            edges,
            bounds: graph.bounds(),
            legend: style.legend(),
            path_color: style.path,
            route_color: style.route,
            start: None,
            goal: None,
        }
    }

    /// Marks the search endpoints
    pub fn with_endpoints(mut self, start: NodeId, goal: NodeId) -> Self {
        self.start = Some(start);
        self.goal = Some(goal);
        self
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        debug!(
            "Wrote scene with {} nodes and {} edges to {}",
            self.nodes.len(),
            self.edges.len(),
            path.display()
        );
        Ok(())
    }
}
