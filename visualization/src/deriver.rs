//! Frame derivation from recorded search steps
//!
//! Each step record is turned into one [`VisualizationFrame`] without
//! touching the search itself. Node colors follow a fixed precedence:
//!
//! 1. every node starts unvisited
//! 2. visited nodes cool from the visited color to the decayed color
//!    as their visit ages
//! 3. open-set nodes take the open-set color
//! 4. the current node takes the current color
//!
//! Historical paths fade out linearly with age.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use transit_core::{SearchGraph, SearchOutcome, StepRecord};

use crate::frame::{PathOverlay, VisualizationFrame};
use crate::style::FrameStyle;

/// Fade progress of a node visited `age` steps ago, in `[0, 1]`
pub fn fade_factor(age: usize, fade_speed: f64) -> f64 {
    (age as f64 * fade_speed).clamp(0.0, 1.0)
}

/// Opacity of a path recorded `age` steps ago, in `[0, 1]`
pub fn path_opacity(age: usize, path_fade_speed: f64) -> f64 {
    (1.0 - age as f64 * path_fade_speed).clamp(0.0, 1.0)
}

/// Turns step records into frames
#[derive(Debug, Clone, Default)]
pub struct FrameDeriver {
    style: FrameStyle,
}

impl FrameDeriver {
    pub fn new(style: FrameStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    /// One frame per record, in record order
    pub fn derive<'a, G, I>(&self, graph: &G, steps: I) -> Vec<VisualizationFrame>
    where
        G: SearchGraph,
        I: IntoIterator<Item = &'a StepRecord>,
    {
        steps
            .into_iter()
            .map(|record| self.derive_frame(graph, record))
            .collect()
    }

    /// Frames for a whole outcome; the last frame also carries the final
    /// route when the goal was reached
    pub fn derive_with_route<G: SearchGraph>(
        &self,
        graph: &G,
        outcome: &SearchOutcome,
    ) -> Vec<VisualizationFrame> {
        let mut frames = self.derive(graph, &outcome.trace);
        if outcome.reached_goal {
            let route = outcome.route();
            if let Some(last) = frames.last_mut().filter(|_| !route.is_empty()) {
                last.route = Some(route);
            }
        }
        debug!(
            "Derived {} frames (route attached: {})",
            frames.len(),
            frames.last().is_some_and(VisualizationFrame::has_route)
        );
        frames
    }

    /// Frame for a single record
    pub fn derive_frame<G: SearchGraph>(&self, graph: &G, record: &StepRecord) -> VisualizationFrame {
        let step = record.step_index;
        let style = &self.style;

        let mut node_colors: BTreeMap<_, _> = graph
            .node_ids()
            .map(|node| (node, style.unvisited))
            .collect();

        for (&node, &first_visit) in &record.visited_with_frame {
            let fade = fade_factor(step.saturating_sub(first_visit), style.fade_speed);
            node_colors.insert(node, style.visited.lerp(style.decayed, fade));
        }
        for &node in &record.open_set_snapshot {
            node_colors.insert(node, style.open_set);
        }
        if let Some(current) = record.current {
            node_colors.insert(current, style.current);
        }

        let path_overlays = record
            .all_paths_so_far
            .iter()
            .map(|historical| PathOverlay {
                path: Arc::clone(&historical.path),
                step_index: historical.step_index,
                opacity: path_opacity(
                    step.saturating_sub(historical.step_index),
                    style.path_fade_speed,
                ),
            })
            .filter(|overlay| !(style.omit_transparent_paths && overlay.opacity <= 0.0))
            .collect();

        VisualizationFrame {
            step_index: step,
            current: record.current,
            node_colors,
            path_overlays,
            route: None,
        }
    }
}
