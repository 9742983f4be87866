//! Instrumented A* search
//!
//! Standard best-first A* over an unweighted graph (every edge costs one
//! hop) guided by a straight-line heuristic, extended to emit one
//! [`StepRecord`] per node expansion. The records together form a
//! replayable trace of the search: current node, open set, scores, visit
//! history and the route to every expanded node.
//!
//! # Step semantics
//! 1. Pick the open node with the lowest f-score (ties: lower g, then lower id).
//! 2. If it is the goal, stop. No record is emitted for the goal.
//! 3. Remove it from the open set, mark it visited, reconstruct its route.
//! 4. Emit the record, then relax every neighbor with cost `g + 1`.
//!
//! Exhausting the open set without reaching the goal is not an error; the
//! goal is then simply missing from the predecessor map.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, trace};

use crate::algorithm::path_finding::heuristic::EuclideanHeuristic;
use crate::algorithm::path_finding::reconstruct::{reconstruct, CameFrom};
use crate::algorithm::state::SearchState;
use crate::algorithm::traits::{
    AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, Heuristic, NodeId, PathResult,
    PathfindingAlgorithm, SearchGraph,
};
use crate::data_structures::graph::Position;
use crate::execution::history::SearchTrace;

/// Everything one search run produced
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub trace: SearchTrace,
    pub came_from: CameFrom,
    pub reached_goal: bool,
    pub metrics: AlgorithmMetrics,
}

impl SearchOutcome {
    /// Final start-to-goal route; empty when the goal is unreachable
    pub fn route(&self) -> Vec<NodeId> {
        reconstruct(&self.came_from, self.trace.start(), self.trace.goal())
    }
}

/// A* engine with a pluggable heuristic
#[derive(Debug)]
pub struct AStar {
    heuristic: Box<dyn Heuristic>,
    profiler: AlgorithmProfiler,
}

impl AStar {
    /// Creates an engine using the plain Euclidean heuristic
    pub fn new() -> Self {
        Self::with_heuristic(Box::new(EuclideanHeuristic::new()))
    }

    pub fn with_heuristic(heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            heuristic,
            profiler: AlgorithmProfiler::new(),
        }
    }

    pub fn heuristic(&self) -> &dyn Heuristic {
        self.heuristic.as_ref()
    }

    /// Metrics of the last run
    pub fn metrics(&self) -> AlgorithmMetrics {
        self.profiler.get_metrics()
    }

    /// Heuristic value of `node` towards `goal`
    pub fn estimate<G: SearchGraph>(
        &self,
        graph: &G,
        node: NodeId,
        goal: Position,
    ) -> Result<f64, AlgorithmError> {
        let position = graph
            .position(node)
            .ok_or(AlgorithmError::InvalidNode(node))?;
        Ok(self.heuristic.estimate(position, goal))
    }

    /// Runs the instrumented search from `start` to `goal`.
    ///
    /// # Errors
    /// [`AlgorithmError::EmptyGraph`] for a graph without nodes,
    /// [`AlgorithmError::InvalidNode`] when an endpoint is not in the graph.
    pub fn search<G: SearchGraph>(
        &mut self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
    ) -> Result<SearchOutcome, AlgorithmError> {
        if graph.is_empty() {
            return Err(AlgorithmError::EmptyGraph);
        }
        if !graph.contains(start) {
            return Err(AlgorithmError::InvalidNode(start));
        }
        let goal_position = graph
            .position(goal)
            .ok_or(AlgorithmError::InvalidNode(goal))?;

        self.profiler.start();
        let mut state = SearchState::new(start, self.estimate(graph, start, goal_position)?);
        let mut steps = Vec::new();
        let mut reached_goal = false;

        while let Some(current) = state.select_current() {
            if current == goal {
                reached_goal = true;
                break;
            }

            state.remove_from_open(current);
            let step_index = steps.len();
            state.mark_visited(current, step_index);
            let record = state.record_step(step_index, current);
            trace!(
                "step {}: expanded {} (g = {:?}, open = {})",
                step_index,
                current,
                state.g_score(current),
                record.open_set_snapshot.len()
            );
            steps.push(record);

            for neighbor in graph.neighbors(current) {
                let estimate = self.estimate(graph, neighbor, goal_position)?;
                state.relax(current, neighbor, estimate);
            }

            self.profiler.record_step();
            self.profiler.sample_open_set(state.open_set().len());
        }

        self.profiler.stop();
        let metrics = self.profiler.get_metrics();
        debug!(
            "A* {} -> {}: {} steps, goal {}, {:?}",
            start,
            goal,
            steps.len(),
            if reached_goal { "reached" } else { "unreachable" },
            metrics.execution_time
        );

        Ok(SearchOutcome {
            trace: SearchTrace::new(start, goal, steps),
            came_from: state.into_came_from(),
            reached_goal,
            metrics,
        })
    }
}

impl Default for AStar {
    fn default() -> Self {
        Self::new()
    }
}

impl PathfindingAlgorithm for AStar {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn find_path<G: SearchGraph>(
        &mut self,
        graph: &G,
        start: NodeId,
        goal: NodeId,
    ) -> Result<PathResult, AlgorithmError> {
        let outcome = self.search(graph, start, goal)?;
        let route = outcome.route();
        let cost = route.len().checked_sub(1).map(|hops| hops as u32);

        Ok(PathResult {
            path: (!route.is_empty()).then_some(route),
            cost,
            metrics: outcome.metrics,
        })
    }

    fn guarantees_optimal_path(&self) -> bool {
        true
    }

    fn heuristic_description(&self) -> Option<String> {
        Some(self.heuristic.describe())
    }
}

/// Runs an instrumented search with the default Euclidean heuristic
pub fn search<G: SearchGraph>(
    graph: &G,
    start: NodeId,
    goal: NodeId,
) -> Result<SearchOutcome, AlgorithmError> {
    AStar::new().search(graph, start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::Graph;
    use approx::assert_relative_eq;

    /// A–B–C–D–E on the x-axis
    fn line_graph() -> Graph {
        let mut graph = Graph::new();
        let ids: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, key)| graph.add_node(*key, *key, Position::new(i as f64, 0.0)))
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1], "line").unwrap();
        }
        graph
    }

    #[test]
    fn test_line_graph_expansion_order() {
        let graph = line_graph();
        let outcome = search(&graph, NodeId(0), NodeId(4)).unwrap();

        assert!(outcome.reached_goal);
        assert_eq!(
            outcome.trace.expansion_order(),
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]
        );
        assert_eq!(
            outcome.route(),
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
        // No record for the goal itself
        assert!(outcome.trace.iter().all(|r| r.current != Some(NodeId(4))));
    }

    #[test]
    fn test_line_graph_snapshots() {
        let graph = line_graph();
        let outcome = search(&graph, NodeId(0), NodeId(4)).unwrap();

        let first = outcome.trace.get(0).unwrap();
        assert_eq!(first.current, Some(NodeId(0)));
        assert!(first.open_set_snapshot.is_empty());
        assert_eq!(&*first.path_to_current, &[NodeId(0)]);
        assert_relative_eq!(first.f_score_snapshot[&NodeId(0)], 4.0);

        let third = outcome.trace.get(2).unwrap();
        assert_eq!(third.current, Some(NodeId(2)));
        assert_eq!(&*third.path_to_current, &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(third.all_paths_so_far.len(), 3);
        assert_eq!(third.visited_with_frame.len(), 3);
        // f is constant along the line: g + h = 4
        for f in third.f_score_snapshot.values() {
            assert_relative_eq!(*f, 4.0);
        }
    }

    #[test]
    fn test_unreachable_goal() {
        let mut graph = line_graph();
        let island = graph.add_node("Z", "Z", Position::new(10.0, 10.0));
        let outcome = search(&graph, NodeId(0), island).unwrap();

        assert!(!outcome.reached_goal);
        assert_eq!(outcome.trace.len(), 5);
        assert!(!outcome.came_from.contains_key(&island));
        assert!(outcome.route().is_empty());
        assert!(outcome.trace.last().unwrap().open_set_snapshot.is_empty());
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = line_graph();
        let outcome = search(&graph, NodeId(2), NodeId(2)).unwrap();

        assert!(outcome.reached_goal);
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.route(), vec![NodeId(2)]);
    }

    #[test]
    fn test_invalid_endpoints() {
        let graph = line_graph();
        assert!(matches!(
            search(&graph, NodeId(0), NodeId(17)),
            Err(AlgorithmError::InvalidNode(NodeId(17)))
        ));
        assert!(matches!(
            search(&graph, NodeId(17), NodeId(0)),
            Err(AlgorithmError::InvalidNode(NodeId(17)))
        ));
        assert!(matches!(
            search(&Graph::new(), NodeId(0), NodeId(0)),
            Err(AlgorithmError::EmptyGraph)
        ));
    }

    #[test]
    fn test_deterministic_tie_break_on_diamond() {
        // 0 at the left, 3 at the right, 1 and 2 symmetric above and below
        let mut graph = Graph::new();
        let s = graph.add_node("s", "s", Position::new(0.0, 0.0));
        let up = graph.add_node("u", "u", Position::new(1.0, 1.0));
        let down = graph.add_node("d", "d", Position::new(1.0, -1.0));
        let t = graph.add_node("t", "t", Position::new(2.0, 0.0));
        graph.add_edge(s, down, "x").unwrap();
        graph.add_edge(s, up, "x").unwrap();
        graph.add_edge(up, t, "x").unwrap();
        graph.add_edge(down, t, "x").unwrap();

        let outcome = search(&graph, s, t).unwrap();
        assert_eq!(outcome.trace.expansion_order(), vec![s, up]);
        assert_eq!(outcome.route(), vec![s, up, t]);

        let again = search(&graph, s, t).unwrap();
        assert_eq!(again.trace, outcome.trace);
    }

    #[test]
    fn test_find_path_reports_cost() {
        let graph = line_graph();
        let mut astar = AStar::new();
        let result = astar.find_path(&graph, NodeId(1), NodeId(4)).unwrap();

        assert_eq!(result.cost, Some(3));
        assert!(result.is_reachable());
        assert_eq!(result.metrics.steps_executed, 3);
        assert_eq!(astar.name(), "A*");
        assert!(astar.guarantees_optimal_path());
        assert!(astar.heuristic_description().is_some());
    }

    #[test]
    fn test_find_path_unreachable() {
        let mut graph = line_graph();
        let island = graph.add_node("Z", "Z", Position::new(0.0, 5.0));
        let result = AStar::new().find_path(&graph, NodeId(0), island).unwrap();

        assert!(result.path.is_none());
        assert!(result.cost.is_none());
    }
}
