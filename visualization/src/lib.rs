//! Animation frames for instrumented A* traces
//!
//! [`FrameDeriver`] turns the step records of a search into self-describing
//! [`VisualizationFrame`]s: visited nodes cool down from crimson to grey,
//! the open set and current node are highlighted, and the route to every
//! expanded node lingers as a fading overlay. [`SceneDescriptor`] holds the
//! static geometry and [`export_frames`] hands frames to a [`FrameSink`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod color;
pub mod deriver;
pub mod export;
pub mod frame;
pub mod scene;
pub mod style;

pub use crate::color::{Color, ColorParseError};
pub use crate::deriver::{fade_factor, path_opacity, FrameDeriver};
pub use crate::export::{
    export_frames, ExportError, ExportOptions, ExportSummary, FrameSink, JsonFrameSink,
};
pub use crate::frame::{PathOverlay, VisualizationFrame};
pub use crate::scene::{SceneDescriptor, SceneEdge, SceneNode};
pub use crate::style::{FrameStyle, LegendEntry, StyleError, FADE_SPEED, PATH_FADE_SPEED};
