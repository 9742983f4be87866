//! `transit-astar`: run an instrumented A* over the cached ZTM network and
//! export one frame per search step.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod args;
mod config;
mod pipeline;

use clap::Parser;
use log::{error, info};

use transit_core::dataset::{ResponseCache, ROUTES_KEY, STOPS_KEY};

use crate::args::Cli;
use crate::config::AppConfig;
use crate::pipeline::CliError;

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_overrides(cli);
    config.validate()?;

    let mut cache = ResponseCache::open(&config.cache_path)?;
    if cli.clear_cache {
        cache.clear()?;
    }
    if let Some(path) = &cli.import_stops {
        pipeline::import_document(&mut cache, STOPS_KEY, path)?;
    }
    if let Some(path) = &cli.import_routes {
        pipeline::import_document(&mut cache, ROUTES_KEY, path)?;
    }
    cache.flush()?;

    let report = pipeline::run(&config, &cache)?;
    info!("A* done!");
    println!(
        "{} steps, goal {}, route of {} stops; frames: {} written, {} skipped, {} failed",
        report.steps,
        if report.reached_goal { "reached" } else { "unreachable" },
        report.route_len,
        report.export.written,
        report.export.skipped,
        report.export.failed
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
