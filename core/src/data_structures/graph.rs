//! Undirected planar graph of transit stops
//!
//! Nodes are stored densely and addressed by [`NodeId`], which is assigned
//! in insertion order. Every node also carries a stable string key (the
//! stop identifier from the source dataset), a display label and an
//! immutable planar position. Edges are undirected, unit cost and carry an
//! opaque label such as the line number.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId, SearchGraph};

/// 2D position with double-precision coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.squared_distance_to(other).sqrt()
    }

    #[inline]
    pub fn squared_distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Per-node payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Stable identifier from the source dataset
    pub key: String,
    /// Human readable label
    pub label: String,
    pub position: Position,
}

/// Undirected edge; `source < target` always holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Opaque label, e.g. the transit line
    pub label: String,
}

/// Axis-aligned bounds of all node positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    fn from_position(pos: Position) -> Self {
        Self { min: pos, max: pos }
    }

    fn include(&mut self, pos: Position) {
        self.min.x = self.min.x.min(pos.x);
        self.min.y = self.min.y.min(pos.y);
        self.max.x = self.max.x.max(pos.x);
        self.max.y = self.max.y.max(pos.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Transit graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<NodeData>,
    adjacency: Vec<Vec<NodeId>>,
    edges: Vec<Edge>,
    /// Normalized `(min, max)` endpoint pair to edge index
    edge_lookup: HashMap<(NodeId, NodeId), usize>,
    key_index: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            adjacency: Vec::with_capacity(nodes),
            edges: Vec::new(),
            edge_lookup: HashMap::new(),
            key_index: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a node, or returns the existing id if the key is already known.
    ///
    /// Positions never change once a node exists.
    pub fn add_node(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        position: Position,
    ) -> NodeId {
        let key = key.into();
        if let Some(&existing) = self.key_index.get(&key) {
            return existing;
        }

        let id = NodeId(self.nodes.len());
        self.key_index.insert(key.clone(), id);
        self.nodes.push(NodeData {
            key,
            label: label.into(),
            position,
        });
        self.adjacency.push(Vec::new());
        id
    }

    /// Adds an undirected edge. Re-adding an existing edge only replaces its label.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        label: impl Into<String>,
    ) -> Result<(), AlgorithmError> {
        if !self.contains(a) {
            return Err(AlgorithmError::InvalidNode(a));
        }
        if !self.contains(b) {
            return Err(AlgorithmError::InvalidNode(b));
        }
        if a == b {
            return Err(AlgorithmError::SelfLoop(a));
        }

        let key = normalize(a, b);
        let label = label.into();
        if let Some(&idx) = self.edge_lookup.get(&key) {
            self.edges[idx].label = label;
            return Ok(());
        }

        self.edge_lookup.insert(key, self.edges.len());
        self.edges.push(Edge {
            source: key.0,
            target: key.1,
            label,
        });
        self.adjacency[a.0].push(b);
        self.adjacency[b.0].push(a);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.key.as_str())
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_lookup.contains_key(&normalize(a, b))
    }

    pub fn edge_label(&self, a: NodeId, b: NodeId) -> Option<&str> {
        self.edge_lookup
            .get(&normalize(a, b))
            .map(|&idx| self.edges[idx].label.as_str())
    }

    /// Bounds of all node positions, `None` for an empty graph
    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut iter = self.nodes.iter().map(|n| n.position);
        let mut bbox = BoundingBox::from_position(iter.next()?);
        for pos in iter {
            bbox.include(pos);
        }
        Some(bbox)
    }

    /// Validates graph integrity
    pub fn validate(&self) -> Result<(), AlgorithmError> {
        for edge in &self.edges {
            if !self.contains(edge.source) || !self.contains(edge.target) {
                return Err(AlgorithmError::InvalidGraph(format!(
                    "edge {}-{} references a missing node",
                    edge.source, edge.target
                )));
            }
            if edge.source == edge.target {
                return Err(AlgorithmError::SelfLoop(edge.source));
            }
        }

        for (id, node) in self.nodes() {
            if !node.position.x.is_finite() || !node.position.y.is_finite() {
                return Err(AlgorithmError::InvalidGraph(format!(
                    "node {} ({}) has a non-finite position",
                    id, node.key
                )));
            }
        }

        let degree_sum: usize = self.adjacency.iter().map(Vec::len).sum();
        if degree_sum != 2 * self.edges.len() {
            return Err(AlgorithmError::InvalidGraph(
                "adjacency lists disagree with edge list".into(),
            ));
        }

        Ok(())
    }
}

#[inline]
fn normalize(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl SearchGraph for Graph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(id.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    fn position(&self, id: NodeId) -> Option<Position> {
        self.node(id).map(|n| n.position)
    }
}
