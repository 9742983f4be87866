//! Execution history of one search
//!
//! A [`SearchTrace`] is the ordered, immutable sequence of step records
//! produced by a single engine run. Any record can be replayed on its own,
//! and the whole trace can be persisted to JSON and read back.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::traits::NodeId;
use crate::execution::tracer::StepRecord;

/// Error types for execution history operations
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid trace point index: {0}")]
    InvalidIndex(usize),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered step records of one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTrace {
    start: NodeId,
    goal: NodeId,
    steps: Vec<StepRecord>,
}

impl SearchTrace {
    pub fn new(start: NodeId, goal: NodeId, steps: Vec<StepRecord>) -> Self {
        Self { start, goal, steps }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn goal(&self) -> NodeId {
        self.goal
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepRecord> {
        self.steps.get(index)
    }

    /// Like [`get`](Self::get), but reports the bad index as an error
    pub fn step(&self, index: usize) -> Result<&StepRecord, HistoryError> {
        self.get(index).ok_or(HistoryError::InvalidIndex(index))
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.steps.iter()
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Step at which `node` was first expanded over the whole run
    pub fn first_visit(&self, node: NodeId) -> Option<usize> {
        self.last().and_then(|record| record.first_visit(node))
    }

    /// Expanded nodes in expansion order
    pub fn expansion_order(&self) -> Vec<NodeId> {
        self.steps.iter().filter_map(|record| record.current).collect()
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, HistoryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the trace as JSON
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), HistoryError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        debug!("Wrote trace with {} steps to {}", self.len(), path.display());
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl<'a> IntoIterator for &'a SearchTrace {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    use crate::algorithm::path_finding::astar::search;
    use crate::data_structures::graph::{Graph, Position};
    use crate::execution::tracer::HistoricalPath;

    fn record(step_index: usize, current: usize) -> StepRecord {
        let path: Arc<[NodeId]> = Arc::from((0..=current).map(NodeId).collect::<Vec<_>>());
        StepRecord {
            step_index,
            current: Some(NodeId(current)),
            open_set_snapshot: BTreeSet::from([NodeId(current + 1)]),
            f_score_snapshot: BTreeMap::from([(NodeId(current), 1.5)]),
            g_score_snapshot: BTreeMap::from([(NodeId(current), current as u32)]),
            visited_with_frame: (0..=current).map(|n| (NodeId(n), n)).collect(),
            path_to_current: path.clone(),
            all_paths_so_far: vec![HistoricalPath { path, step_index }],
        }
    }

    fn trace() -> SearchTrace {
        SearchTrace::new(NodeId(0), NodeId(3), vec![record(0, 0), record(1, 1), record(2, 2)])
    }

    #[test]
    fn test_trace_navigation() {
        let trace = trace();

        assert_eq!(trace.len(), 3);
        assert!(!trace.is_empty());
        assert_eq!(trace.get(1).and_then(|r| r.current), Some(NodeId(1)));
        assert!(matches!(trace.step(7), Err(HistoryError::InvalidIndex(7))));
        assert_eq!(trace.first_visit(NodeId(2)), Some(2));
        assert_eq!(trace.first_visit(NodeId(3)), None);
        assert_eq!(
            trace.expansion_order(),
            vec![NodeId(0), NodeId(1), NodeId(2)]
        );
        assert_eq!((&trace).into_iter().count(), 3);
    }

    #[test]
    fn test_trace_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");

        let trace = trace();
        trace.write_to(&path).unwrap();
        let restored = SearchTrace::read_from(&path).unwrap();

        assert_eq!(restored, trace);
    }

    #[test]
    fn test_real_search_survives_json_round_trip() {
        // Stop-like coordinates give f-scores with full-width mantissas
        let mut graph = Graph::new();
        let ids: Vec<_> = (0..120)
            .map(|i| {
                let lon = 20.9137 + i as f64 * 0.0013;
                let lat = 52.1871 + (i % 7) as f64 * 0.00041;
                graph.add_node(format!("{i}:01"), format!("Stop {i}"), Position::new(lon, lat))
            })
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1], "N44").unwrap();
        }
        for pair in ids.chunks(3) {
            if let [a, _, c] = pair {
                graph.add_edge(*a, *c, "520").unwrap();
            }
        }

        let trace = search(&graph, ids[0], ids[119]).unwrap().trace;
        assert!(trace.len() > 50);

        let restored = SearchTrace::from_json(&trace.to_json().unwrap()).unwrap();
        for (before, after) in trace.iter().zip(restored.iter()) {
            for (node, f) in &before.f_score_snapshot {
                assert_eq!(after.f_score_snapshot[node].to_bits(), f.to_bits());
            }
        }
        assert_eq!(restored, trace);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        trace.write_to(&path).unwrap();
        assert_eq!(SearchTrace::read_from(&path).unwrap(), trace);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(
            SearchTrace::from_json("{\"start\": 0"),
            Err(HistoryError::SerializationError(_))
        ));
    }
}
