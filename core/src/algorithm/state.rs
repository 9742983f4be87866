//! Mutable A* search state
//!
//! The state is owned exclusively by one engine run. Step records are cut
//! from it as owned copies, so nothing emitted earlier is affected by later
//! relaxations.
//!
//! # Invariants
//! - `f[n] == g[n] + h(n)` for every reached node
//! - `g[start] == 0`
//! - `visited` entries are written once and never overwritten
//!
//! There is no closed set: a visited node whose g-score later improves is
//! reopened, and keeps its first visit step.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::algorithm::path_finding::reconstruct::{reconstruct, CameFrom};
use crate::algorithm::traits::NodeId;
use crate::execution::tracer::{HistoricalPath, StepRecord};

/// Live search state of one A* run
#[derive(Debug, Clone)]
pub struct SearchState {
    start: NodeId,
    open_set: BTreeSet<NodeId>,
    came_from: CameFrom,
    g_score: BTreeMap<NodeId, u32>,
    f_score: BTreeMap<NodeId, f64>,
    visited: BTreeMap<NodeId, usize>,
    all_paths: Vec<HistoricalPath>,
}

impl SearchState {
    /// Creates the initial state: only `start` is open, with `g = 0` and `f = h(start)`
    pub fn new(start: NodeId, start_estimate: f64) -> Self {
        Self {
            start,
            open_set: BTreeSet::from([start]),
            came_from: CameFrom::new(),
            g_score: BTreeMap::from([(start, 0)]),
            f_score: BTreeMap::from([(start, start_estimate)]),
            visited: BTreeMap::new(),
            all_paths: Vec::new(),
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn open_set(&self) -> &BTreeSet<NodeId> {
        &self.open_set
    }

    pub fn came_from(&self) -> &CameFrom {
        &self.came_from
    }

    pub fn g_score(&self, node: NodeId) -> Option<u32> {
        self.g_score.get(&node).copied()
    }

    pub fn f_score(&self, node: NodeId) -> Option<f64> {
        self.f_score.get(&node).copied()
    }

    pub fn visited(&self) -> &BTreeMap<NodeId, usize> {
        &self.visited
    }

    /// Hands the predecessor map over once the run is finished
    pub fn into_came_from(self) -> CameFrom {
        self.came_from
    }

    /// Open node with the lowest f-score.
    ///
    /// Ties are broken by the lower g-score, then by the lower node id, so
    /// the trace is fully deterministic.
    pub fn select_current(&self) -> Option<NodeId> {
        self.open_set
            .iter()
            .copied()
            .min_by(|&a, &b| self.compare_priority(a, b))
    }

    fn compare_priority(&self, a: NodeId, b: NodeId) -> Ordering {
        let fa = self.f_score(a).unwrap_or(f64::INFINITY);
        let fb = self.f_score(b).unwrap_or(f64::INFINITY);
        let ga = self.g_score(a).unwrap_or(u32::MAX);
        let gb = self.g_score(b).unwrap_or(u32::MAX);
        fa.total_cmp(&fb).then(ga.cmp(&gb)).then(a.cmp(&b))
    }

    pub fn remove_from_open(&mut self, node: NodeId) -> bool {
        self.open_set.remove(&node)
    }

    /// Records the first expansion of `node`; later calls keep the first step
    pub fn mark_visited(&mut self, node: NodeId, step_index: usize) {
        self.visited.entry(node).or_insert(step_index);
    }

    /// Relaxes the unit-cost edge `current -> neighbor`.
    ///
    /// Returns `true` when the neighbor's scores improved strictly.
    pub fn relax(&mut self, current: NodeId, neighbor: NodeId, neighbor_estimate: f64) -> bool {
        let Some(current_g) = self.g_score(current) else {
            return false;
        };
        let tentative = current_g.saturating_add(1);
        if self.g_score(neighbor).is_some_and(|g| tentative >= g) {
            return false;
        }

        self.came_from.insert(neighbor, current);
        self.g_score.insert(neighbor, tentative);
        self.f_score
            .insert(neighbor, f64::from(tentative) + neighbor_estimate);
        self.open_set.insert(neighbor);
        true
    }

    /// Reconstructs the current route to `node` and cuts a step record.
    ///
    /// Appends the route to the running history before snapshotting, so the
    /// record's history ends with its own path.
    pub fn record_step(&mut self, step_index: usize, current: NodeId) -> StepRecord {
        let path: Arc<[NodeId]> = reconstruct(&self.came_from, self.start, current).into();
        self.all_paths.push(HistoricalPath {
            path: Arc::clone(&path),
            step_index,
        });

        StepRecord {
            step_index,
            current: Some(current),
            open_set_snapshot: self.open_set.clone(),
            f_score_snapshot: self.f_score.clone(),
            g_score_snapshot: self.g_score.clone(),
            visited_with_frame: self.visited.clone(),
            path_to_current: path,
            all_paths_so_far: self.all_paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::path_finding::astar::search;
    use crate::data_structures::graph::{Graph, Position};
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state() {
        let state = SearchState::new(NodeId(3), 4.5);

        assert_eq!(state.select_current(), Some(NodeId(3)));
        assert_eq!(state.g_score(NodeId(3)), Some(0));
        assert_relative_eq!(state.f_score(NodeId(3)).unwrap(), 4.5);
        assert!(state.came_from().is_empty());
        assert!(state.visited().is_empty());
    }

    #[test]
    fn test_relax_only_strictly_better() {
        let mut state = SearchState::new(NodeId(0), 2.0);
        assert!(state.relax(NodeId(0), NodeId(1), 1.0));
        assert_eq!(state.g_score(NodeId(1)), Some(1));
        assert_relative_eq!(state.f_score(NodeId(1)).unwrap(), 2.0);

        // Equal cost does not replace the predecessor
        assert!(state.relax(NodeId(0), NodeId(2), 1.0));
        assert!(!state.relax(NodeId(2), NodeId(1), 1.0));
        assert_eq!(state.came_from().get(&NodeId(1)), Some(&NodeId(0)));

        // Unknown current cannot relax anything
        assert!(!state.relax(NodeId(9), NodeId(4), 0.0));
    }

    #[test]
    fn test_tie_break_prefers_lower_g_then_lower_id() {
        let mut state = SearchState::new(NodeId(0), 2.0);
        state.remove_from_open(NodeId(0));
        state.relax(NodeId(0), NodeId(5), 1.0);
        state.relax(NodeId(0), NodeId(4), 1.0);
        assert_eq!(state.select_current(), Some(NodeId(4)));

        // Same f = 2.0 but g = 2 for node 1: node 4 still wins on g
        state.relax(NodeId(4), NodeId(1), 0.0);
        assert_eq!(state.select_current(), Some(NodeId(4)));
    }

    #[test]
    fn test_mark_visited_never_overwrites() {
        let mut state = SearchState::new(NodeId(0), 0.0);
        state.mark_visited(NodeId(0), 0);
        state.mark_visited(NodeId(0), 5);
        assert_eq!(state.visited().get(&NodeId(0)), Some(&0));
    }

    #[test]
    fn test_records_are_independent_copies() {
        let mut state = SearchState::new(NodeId(0), 1.0);
        state.remove_from_open(NodeId(0));
        state.mark_visited(NodeId(0), 0);
        let first = state.record_step(0, NodeId(0));

        state.relax(NodeId(0), NodeId(1), 0.0);
        state.remove_from_open(NodeId(1));
        state.mark_visited(NodeId(1), 1);
        let second = state.record_step(1, NodeId(1));

        assert!(first.open_set_snapshot.is_empty());
        assert_eq!(first.visited_with_frame.len(), 1);
        assert_eq!(first.all_paths_so_far.len(), 1);
        assert!(!first.f_score_snapshot.contains_key(&NodeId(1)));

        assert_eq!(second.all_paths_so_far.len(), 2);
        assert_eq!(&*second.path_to_current, &[NodeId(0), NodeId(1)]);
        assert_eq!(second.all_paths_so_far[0], first.all_paths_so_far[0]);
    }

    /// S-A-C-B is found first; D is far from the goal and only later
    /// offers the shorter S-D-B, after B's route was already recorded.
    fn late_shortcut_graph() -> (Graph, [NodeId; 6]) {
        let mut graph = Graph::new();
        let s = graph.add_node("S", "S", Position::new(0.0, 0.0));
        let a = graph.add_node("A", "A", Position::new(5.0, 0.0));
        let c = graph.add_node("C", "C", Position::new(7.0, 0.0));
        let b = graph.add_node("B", "B", Position::new(8.0, 0.0));
        let d = graph.add_node("D", "D", Position::new(0.0, -20.0));
        let g = graph.add_node("G", "G", Position::new(10.0, 0.0));
        for (from, to) in [(s, a), (a, c), (c, b), (s, d), (d, b), (d, g)] {
            graph.add_edge(from, to, "1").unwrap();
        }
        (graph, [s, a, c, b, d, g])
    }

    #[test]
    fn test_recorded_paths_stay_stale_after_shortcut() {
        let (graph, [s, a, c, b, d, g]) = late_shortcut_graph();
        let outcome = search(&graph, s, g).unwrap();

        assert!(outcome.reached_goal);
        assert_eq!(outcome.trace.expansion_order(), vec![s, a, c, b, d]);

        // B was re-parented through D after its own expansion
        assert_eq!(outcome.came_from.get(&b), Some(&d));
        assert_eq!(reconstruct(&outcome.came_from, s, b), vec![s, d, b]);

        let last = outcome.trace.last().unwrap();
        let recorded = &last.all_paths_so_far[3];
        assert_eq!(recorded.step_index, 3);
        assert_eq!(&*recorded.path, &[s, a, c, b]);
        assert_eq!(
            recorded,
            &outcome.trace.get(3).unwrap().all_paths_so_far[3]
        );

        // B keeps its first visit step, and no frame is cut for the goal
        assert_eq!(last.first_visit(b), Some(3));
        assert_eq!(outcome.route(), vec![s, d, g]);
    }
}
