//! Step recording and replayable search traces
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod history;
pub mod tracer;

pub use self::history::{HistoryError, SearchTrace};
pub use self::tracer::{HistoricalPath, StepRecord};
