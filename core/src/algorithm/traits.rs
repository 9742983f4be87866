//! Core algorithm trait definitions for the transit search engine
//!
//! This module establishes the seams between the search engine and its
//! collaborators: the graph it walks, the heuristic guiding it and the
//! path-finding interface exposed to callers. Error and metric types shared
//! by every search live here as well.
//!
//! # Key Design Principles
//! - Graphs are consumed read-only through [`SearchGraph`]
//! - Node identity is a dense, totally ordered [`NodeId`]
//! - Unreachability is a property of the result, never an error
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Debug, Display};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::data_structures::graph::Position;

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Comprehensive error types for algorithm operations
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid node: {0}")]
    InvalidNode(NodeId),

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("Self-loop rejected at node {0}")]
    SelfLoop(NodeId),

    #[error("Invalid graph state: {0}")]
    InvalidGraph(String),
}

/// Read-only view of a planar graph consumed by the search engine.
///
/// Implementors must keep node identities and positions stable for the
/// whole duration of a search.
pub trait SearchGraph {
    /// Number of nodes in the graph
    fn node_count(&self) -> usize;

    /// Whether the node exists
    fn contains(&self, id: NodeId) -> bool;

    /// All node identifiers in ascending order
    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_;

    /// Direct neighbors of a node, in a stable order
    fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_;

    /// Planar position of a node
    fn position(&self, id: NodeId) -> Option<Position>;

    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}

/// Estimates the remaining cost from a position to the goal position
pub trait Heuristic: Debug + Send + Sync {
    /// Estimated remaining cost; must be non-negative and finite
    fn estimate(&self, from: Position, goal: Position) -> f64;

    /// Human readable description of the estimate
    fn describe(&self) -> String;
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    pub steps_executed: usize,
    pub max_open_set: usize,
    pub execution_time: Duration,
}

/// Path result for pathfinding algorithms
#[derive(Debug, Clone)]
pub struct PathResult {
    /// Start-to-goal route, `None` when the goal is unreachable
    pub path: Option<Vec<NodeId>>,
    /// Hop count of the route
    pub cost: Option<u32>,
    pub metrics: AlgorithmMetrics,
}

impl PathResult {
    pub fn is_reachable(&self) -> bool {
        self.path.is_some()
    }
}

/// Pathfinding algorithm trait
pub trait PathfindingAlgorithm: Debug {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Finds a path between two nodes of the graph
    ///
    /// # Errors
    /// Fails with [`AlgorithmError::InvalidNode`] when either endpoint is
    /// missing from the graph. An unreachable goal is reported through
    /// [`PathResult::path`] being `None`.
    fn find_path<G: SearchGraph>(
        &mut self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
    ) -> Result<PathResult, AlgorithmError>;

    /// Returns whether the algorithm guarantees optimal paths
    fn guarantees_optimal_path(&self) -> bool;

    /// Returns the heuristic function used (if applicable)
    fn heuristic_description(&self) -> Option<String>;
}

/// Performance profiling integration
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets metrics and starts the clock
    pub fn start(&mut self) {
        self.metrics = AlgorithmMetrics::default();
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn sample_open_set(&mut self, size: usize) {
        self.metrics.max_open_set = self.metrics.max_open_set.max(size);
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}
