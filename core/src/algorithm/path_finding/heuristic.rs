//! Straight-line distance heuristic
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::traits::Heuristic;
use crate::data_structures::graph::Position;

/// Euclidean distance between a node and the goal, scaled by `weight`.
///
/// A weight of `1.0` keeps the estimate admissible for unit-cost edges
/// whose endpoints are at least one distance unit apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuclideanHeuristic {
    weight: f64,
}

impl EuclideanHeuristic {
    pub fn new() -> Self {
        Self { weight: 1.0 }
    }

    /// Non-finite or negative weights fall back to `1.0`
    pub fn with_weight(weight: f64) -> Self {
        let weight = if weight.is_finite() && weight >= 0.0 {
            weight
        } else {
            1.0
        };
        Self { weight }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Default for EuclideanHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for EuclideanHeuristic {
    #[inline]
    fn estimate(&self, from: Position, goal: Position) -> f64 {
        self.weight * from.distance_to(&goal)
    }

    fn describe(&self) -> String {
        if self.weight == 1.0 {
            "euclidean distance to goal".to_string()
        } else {
            format!("euclidean distance to goal x{}", self.weight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean_estimate() {
        let h = EuclideanHeuristic::new();
        assert_relative_eq!(
            h.estimate(Position::new(0.0, 0.0), Position::new(3.0, 4.0)),
            5.0
        );
        assert_relative_eq!(h.estimate(Position::new(2.0, 2.0), Position::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_weighted_estimate() {
        let h = EuclideanHeuristic::with_weight(2.0);
        assert_relative_eq!(
            h.estimate(Position::new(0.0, 0.0), Position::new(0.0, 1.5)),
            3.0
        );
        assert!(h.describe().contains("x2"));
    }

    #[test]
    fn test_invalid_weight_falls_back() {
        assert_eq!(EuclideanHeuristic::with_weight(f64::NAN).weight(), 1.0);
        assert_eq!(EuclideanHeuristic::with_weight(-3.0).weight(), 1.0);
    }
}
