//! Self-describing animation frames
//!
//! A frame carries everything a renderer needs to draw one step on its own:
//! a color for every node, the path overlays with their opacity, and for the
//! last frame of a successful search the final route.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use transit_core::NodeId;

use crate::color::Color;

/// A historical path drawn at a given opacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOverlay {
    pub path: Arc<[NodeId]>,
    /// Step at which the path was recorded
    pub step_index: usize,
    /// In `[0, 1]`
    pub opacity: f64,
}

/// Render state of one search step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationFrame {
    pub step_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<NodeId>,
    pub node_colors: BTreeMap<NodeId, Color>,
    /// Oldest first
    pub path_overlays: Vec<PathOverlay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<NodeId>>,
}

impl VisualizationFrame {
    pub fn color_of(&self, node: NodeId) -> Option<Color> {
        self.node_colors.get(&node).copied()
    }

    /// Overlay recorded at `step_index`, if it is still drawn
    pub fn overlay_from(&self, step_index: usize) -> Option<&PathOverlay> {
        self.path_overlays
            .iter()
            .find(|overlay| overlay.step_index == step_index)
    }

    pub fn has_route(&self) -> bool {
        self.route.as_ref().is_some_and(|route| !route.is_empty())
    }
}
