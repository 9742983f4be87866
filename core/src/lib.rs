//! Instrumented A* over public transport stop graphs
//!
//! The crate is organised bottom-up:
//!
//! - [`data_structures`]: the undirected stop graph and planar positions
//! - [`algorithm`]: the search engine, its state, heuristics and path reconstruction
//! - [`execution`]: per-step records and the replayable [`SearchTrace`]
//! - [`validation`]: checks that a produced trace is internally consistent
//! - [`dataset`]: ZTM stop/route parsing, the response cache and the graph builder
//!
//! ```
//! use transit_core::{search, Graph, Position};
//!
//! let mut graph = Graph::new();
//! let a = graph.add_node("a", "A", Position::new(0.0, 0.0));
//! let b = graph.add_node("b", "B", Position::new(1.0, 0.0));
//! graph.add_edge(a, b, "1").unwrap();
//!
//! let outcome = search(&graph, a, b).unwrap();
//! assert_eq!(outcome.route(), vec![a, b]);
//! assert_eq!(outcome.trace.len(), 1);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod dataset;
pub mod execution;
pub mod validation;

pub use crate::algorithm::{
    reconstruct, search, AStar, AlgorithmError, AlgorithmMetrics, CameFrom, EuclideanHeuristic,
    Heuristic, NodeId, PathResult, PathfindingAlgorithm, SearchGraph, SearchOutcome, SearchState,
};
pub use crate::data_structures::{BoundingBox, Edge, Graph, NodeData, Position};
pub use crate::execution::{HistoricalPath, HistoryError, SearchTrace, StepRecord};
pub use crate::validation::{verify_trace, ValidationError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
