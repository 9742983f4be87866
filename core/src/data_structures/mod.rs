//! Graph storage
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;

pub use self::graph::{BoundingBox, Edge, Graph, NodeData, Position};
