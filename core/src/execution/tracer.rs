//! Per-expansion trace points
//!
//! A [`StepRecord`] is a self-contained, point-in-time picture of the search
//! taken right after a node is popped from the open set and before its
//! neighbors are relaxed. Records own their snapshots; later mutation of the
//! live search state never reaches a record that has already been emitted.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;

/// Route to the node expanded at `step_index`, frozen at that step.
///
/// Entries are never rewritten: if a cheaper route to an ancestor is found
/// later, older entries keep the route as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPath {
    pub path: Arc<[NodeId]>,
    pub step_index: usize,
}

/// Snapshot of the search at one expansion step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 0-based, gapless
    pub step_index: usize,

    /// Node popped from the open set at this step
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current: Option<NodeId>,

    /// Open set after removing `current`, before adding its new neighbors
    pub open_set_snapshot: BTreeSet<NodeId>,

    /// f-scores of every reached node at this moment
    pub f_score_snapshot: BTreeMap<NodeId, f64>,

    /// g-scores (hop counts) of every reached node at this moment
    pub g_score_snapshot: BTreeMap<NodeId, u32>,

    /// Node to the step at which it was first expanded
    pub visited_with_frame: BTreeMap<NodeId, usize>,

    /// Route from start to `current`, empty if none is known
    pub path_to_current: Arc<[NodeId]>,

    /// One entry per step so far, this one included
    pub all_paths_so_far: Vec<HistoricalPath>,
}

impl StepRecord {
    /// Step at which `node` was first expanded, as known at this step
    pub fn first_visit(&self, node: NodeId) -> Option<usize> {
        self.visited_with_frame.get(&node).copied()
    }

    pub fn is_open(&self, node: NodeId) -> bool {
        self.open_set_snapshot.contains(&node)
    }

    /// Newest historical path, i.e. the one recorded at this step
    pub fn latest_path(&self) -> Option<&HistoricalPath> {
        self.all_paths_so_far.last()
    }
}
