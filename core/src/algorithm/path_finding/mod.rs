//! Path-finding algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod astar;
pub mod heuristic;
pub mod reconstruct;

pub use self::astar::{search, AStar, SearchOutcome};
pub use self::heuristic::EuclideanHeuristic;
pub use self::reconstruct::{reconstruct, CameFrom};
