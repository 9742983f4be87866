//! Frame palette and fade parameters
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;

/// Node fade progress per step after the first visit
pub const FADE_SPEED: f64 = 0.1;

/// Path overlay opacity lost per step after the path was recorded
pub const PATH_FADE_SPEED: f64 = 0.2;

/// Style validation error
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidSpeed { name: &'static str, value: f64 },
}

/// Colors and fade speeds used to derive frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    /// Node being expanded
    pub current: Color,
    /// Nodes waiting in the open set
    pub open_set: Color,
    /// Nodes never expanded
    pub unvisited: Color,
    /// Nodes expanded on this very step
    pub visited: Color,
    /// Nodes expanded long ago
    pub decayed: Color,
    /// Historical path overlays; alpha comes from the overlay opacity
    pub path: Color,
    /// Final start-to-goal route
    pub route: Color,
    pub fade_speed: f64,
    pub path_fade_speed: f64,
    /// Drop overlays whose opacity reached zero
    pub omit_transparent_paths: bool,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            current: Color::RED,
            open_set: Color::GREEN,
            unvisited: Color::LIGHT_GREY,
            visited: Color::CRIMSON,
            decayed: Color::GREY,
            path: Color::RED,
            route: Color::ROYAL_BLUE,
            fade_speed: FADE_SPEED,
            path_fade_speed: PATH_FADE_SPEED,
            omit_transparent_paths: true,
        }
    }
}

/// One legend row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

impl FrameStyle {
    pub fn validate(&self) -> Result<(), StyleError> {
        for (name, value) in [
            ("fade_speed", self.fade_speed),
            ("path_fade_speed", self.path_fade_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StyleError::InvalidSpeed { name, value });
            }
        }
        Ok(())
    }

    /// Legend rows in display order
    pub fn legend(&self) -> Vec<LegendEntry> {
        [
            ("Current", self.current),
            ("Open Set", self.open_set),
            ("Visited", self.visited),
            ("Unvisited", self.unvisited),
        ]
        .into_iter()
        .map(|(label, color)| LegendEntry {
            label: label.to_string(),
            color,
        })
        .collect()
    }
}
