//! Search algorithm framework
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod path_finding;
pub mod state;

pub use self::traits::*;
pub use self::path_finding::*;
pub use self::state::SearchState;
