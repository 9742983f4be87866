//! Correctness verification of search traces
//!
//! Re-checks a finished search against the properties every trace must
//! satisfy, without re-running the search:
//!
//! - step indices are exactly `0..N` with no gaps
//! - `visited_with_frame` only grows and never rewrites an entry
//! - every snapshot satisfies `f == g + h`
//! - `current` is never part of its own open-set snapshot
//! - historical paths are append-only and each one is a chain of graph edges
//!   starting at the search start
//! - the final route, when the goal was reached, runs from start to goal
//!   along graph edges
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

use crate::algorithm::path_finding::astar::SearchOutcome;
use crate::algorithm::traits::{AlgorithmError, Heuristic, NodeId, SearchGraph};
use crate::data_structures::graph::Position;
use crate::execution::tracer::StepRecord;

/// Absolute tolerance for score comparisons
const SCORE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("step index gap: expected {expected}, found {found}")]
    StepIndexGap { expected: usize, found: usize },

    #[error("step {step} has no current node")]
    MissingCurrent { step: usize },

    #[error("step {step}: current node {node} is still in the open set")]
    CurrentStillOpen { step: usize, node: NodeId },

    #[error("step {step}: visited entry for {node} changed from {before:?} to {after:?}")]
    VisitedRewritten {
        step: usize,
        node: NodeId,
        before: Option<usize>,
        after: Option<usize>,
    },

    #[error("step {step}: node {node} has f = {f} but g + h = {expected}")]
    ScoreMismatch {
        step: usize,
        node: NodeId,
        f: f64,
        expected: f64,
    },

    #[error("step {step}: historical path entry {index} was rewritten")]
    HistoryRewritten { step: usize, index: usize },

    #[error("step {step}: invalid path: {reason}")]
    InvalidPath { step: usize, reason: String },

    #[error("invalid final route: {0}")]
    InvalidRoute(String),

    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}

/// Verifies every record of `outcome` and its final route
pub fn verify_trace<G: SearchGraph>(
    graph: &G,
    heuristic: &dyn Heuristic,
    outcome: &SearchOutcome,
) -> Result<(), ValidationError> {
    let trace = &outcome.trace;
    let start = trace.start();
    let goal = trace.goal();
    let goal_position = graph
        .position(goal)
        .ok_or(AlgorithmError::InvalidNode(goal))?;

    let mut previous: Option<&StepRecord> = None;
    for (expected, record) in trace.iter().enumerate() {
        if record.step_index != expected {
            return Err(ValidationError::StepIndexGap {
                expected,
                found: record.step_index,
            });
        }
        let step = record.step_index;

        let current = record
            .current
            .ok_or(ValidationError::MissingCurrent { step })?;
        if record.is_open(current) {
            return Err(ValidationError::CurrentStillOpen {
                step,
                node: current,
            });
        }
        // A re-expanded node keeps the step of its first expansion
        let before = previous.and_then(|p| p.first_visit(current));
        if record.first_visit(current) != Some(before.unwrap_or(step)) {
            return Err(ValidationError::VisitedRewritten {
                step,
                node: current,
                before,
                after: record.first_visit(current),
            });
        }

        if let Some(previous) = previous {
            check_visited_growth(previous, record)?;
            check_history_append_only(previous, record)?;
        }

        check_scores(graph, heuristic, goal_position, record)?;
        check_path(graph, start, Some(current), &record.path_to_current)
            .map_err(|reason| ValidationError::InvalidPath { step, reason })?;

        match record.latest_path() {
            Some(latest)
                if latest.step_index == step && latest.path == record.path_to_current => {}
            _ => {
                return Err(ValidationError::InvalidPath {
                    step,
                    reason: "history does not end with the path to current".into(),
                })
            }
        }
        if record.all_paths_so_far.len() != step + 1 {
            return Err(ValidationError::HistoryRewritten {
                step,
                index: record.all_paths_so_far.len(),
            });
        }

        previous = Some(record);
    }

    if outcome.reached_goal {
        let route = outcome.route();
        if route.is_empty() {
            return Err(ValidationError::InvalidRoute(
                "goal reached but no route reconstructs".into(),
            ));
        }
        check_path(graph, start, Some(goal), &route).map_err(ValidationError::InvalidRoute)?;
    } else if outcome.came_from.contains_key(&goal) {
        return Err(ValidationError::InvalidRoute(
            "goal has a predecessor but was reported unreachable".into(),
        ));
    }

    Ok(())
}

/// Checks that `path` starts at `start`, ends at `end` and follows graph edges.
///
/// An empty path is accepted; it means "no route known".
pub fn check_path<G: SearchGraph>(
    graph: &G,
    start: NodeId,
    end: Option<NodeId>,
    path: &[NodeId],
) -> Result<(), String> {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return Ok(());
    };
    if first != start {
        return Err(format!("path starts at {first}, not at {start}"));
    }
    if let Some(end) = end {
        if last != end {
            return Err(format!("path ends at {last}, not at {end}"));
        }
    }
    for pair in path.windows(2) {
        if !graph.neighbors(pair[0]).any(|n| n == pair[1]) {
            return Err(format!("{} and {} are not adjacent", pair[0], pair[1]));
        }
    }
    Ok(())
}

fn check_visited_growth(previous: &StepRecord, record: &StepRecord) -> Result<(), ValidationError> {
    for (&node, &before) in &previous.visited_with_frame {
        let after = record.first_visit(node);
        if after != Some(before) {
            return Err(ValidationError::VisitedRewritten {
                step: record.step_index,
                node,
                before: Some(before),
                after,
            });
        }
    }
    Ok(())
}

fn check_history_append_only(
    previous: &StepRecord,
    record: &StepRecord,
) -> Result<(), ValidationError> {
    for (index, old) in previous.all_paths_so_far.iter().enumerate() {
        if record.all_paths_so_far.get(index) != Some(old) {
            return Err(ValidationError::HistoryRewritten {
                step: record.step_index,
                index,
            });
        }
    }
    Ok(())
}

fn check_scores<G: SearchGraph>(
    graph: &G,
    heuristic: &dyn Heuristic,
    goal_position: Position,
    record: &StepRecord,
) -> Result<(), ValidationError> {
    let step = record.step_index;
    for (&node, &f) in &record.f_score_snapshot {
        let g = record.g_score_snapshot.get(&node).ok_or_else(|| {
            ValidationError::InvalidPath {
                step,
                reason: format!("node {node} has an f-score but no g-score"),
            }
        })?;
        let position = graph
            .position(node)
            .ok_or(AlgorithmError::InvalidNode(node))?;
        let expected = f64::from(*g) + heuristic.estimate(position, goal_position);
        if (f - expected).abs() > SCORE_TOLERANCE {
            return Err(ValidationError::ScoreMismatch {
                step,
                node,
                f,
                expected,
            });
        }
    }
    Ok(())
}
