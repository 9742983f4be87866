//! Command-line arguments
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use clap::{value_parser, ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "transit-astar",
    version,
    about = "Step-by-step A* over the Warsaw public transport network"
)]
pub struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub config: Option<PathBuf>,

    /// Cache of raw stop and route documents
    #[arg(long, value_parser = value_parser!(PathBuf))]
    pub cache: Option<PathBuf>,

    /// Store a saved stops document in the cache before running
    #[arg(long, value_parser = value_parser!(PathBuf), help_heading = "Cache")]
    pub import_stops: Option<PathBuf>,

    /// Store a saved routes document in the cache before running
    #[arg(long, value_parser = value_parser!(PathBuf), help_heading = "Cache")]
    pub import_routes: Option<PathBuf>,

    /// Empty the cache (and delete its file) before importing
    #[arg(long, help_heading = "Cache")]
    pub clear_cache: bool,

    /// Start stop, as `zespol:slupek`
    #[arg(long)]
    pub start: Option<String>,

    /// Goal stop, as `zespol:slupek`
    #[arg(long)]
    pub goal: Option<String>,

    /// Directory receiving scene.json and the per-step frames
    #[arg(long, value_parser = value_parser!(PathBuf), help_heading = "Output")]
    pub frames_dir: Option<PathBuf>,

    /// Do not export frames before this step (resume an interrupted export)
    #[arg(long, help_heading = "Output")]
    pub skip_until: Option<usize>,

    /// Also write the full search trace as JSON
    #[arg(long, value_parser = value_parser!(PathBuf), help_heading = "Output")]
    pub trace_out: Option<PathBuf>,

    /// Write indented frame JSON
    #[arg(long, help_heading = "Output")]
    pub pretty_frames: bool,

    /// Check the trace for consistency before exporting
    #[arg(long)]
    pub verify: bool,

    /// Scale the straight-line estimate (1.0 keeps routes shortest)
    #[arg(long, value_name = "WEIGHT")]
    pub heuristic_weight: Option<f64>,

    /// More logging. Pass up to three times.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
