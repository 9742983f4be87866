//! End-to-end run: cache, graph, search, frames
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;
use thiserror::Error;

use transit_core::dataset::{
    build_graph, CacheError, DatasetError, ResponseCache, ROUTES_KEY, STOPS_KEY,
};
use transit_core::{
    verify_trace, AStar, AlgorithmError, EuclideanHeuristic, Graph, HistoryError, NodeId,
    ValidationError,
};
use transit_visualization::{
    export_frames, ExportError, ExportOptions, ExportSummary, FrameDeriver, JsonFrameSink,
    SceneDescriptor,
};

use crate::config::{AppConfig, ConfigError};

/// File name of the static scene inside the frames directory
pub const SCENE_FILE: &str = "scene.json";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Search failed: {0}")]
    Algorithm(#[from] AlgorithmError),

    #[error("Trace verification failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Cannot write trace: {0}")]
    History(#[from] HistoryError),

    #[error("Cannot import {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot import {path}: {source}")]
    ImportFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache {path} has no '{key}' document; import one with --import-stops/--import-routes")]
    MissingData { key: &'static str, path: PathBuf },
}

/// What one run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub steps: usize,
    pub reached_goal: bool,
    /// Stops on the final route, 0 when unreachable
    pub route_len: usize,
    pub export: ExportSummary,
}

/// Reads a saved API response and stores it in the cache under `key`
pub fn import_document(
    cache: &mut ResponseCache,
    key: &'static str,
    path: &Path,
) -> Result<(), CliError> {
    let file = File::open(path).map_err(|source| CliError::Import {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ImportFormat {
            path: path.to_path_buf(),
            source,
        })?;
    cache.put(key, document);
    info!("Imported '{}' from {}", key, path.display());
    Ok(())
}

fn cached<'c>(cache: &'c ResponseCache, key: &'static str) -> Result<&'c Value, CliError> {
    cache.get(key).ok_or_else(|| CliError::MissingData {
        key,
        path: cache.path().to_path_buf(),
    })
}

fn resolve_stop(graph: &Graph, key: &str) -> Result<NodeId, DatasetError> {
    graph
        .node_by_key(key.trim())
        .ok_or_else(|| DatasetError::UnknownStop(key.to_string()))
}

/// Builds the graph from cached documents, searches, and exports the frames
pub fn run(config: &AppConfig, cache: &ResponseCache) -> Result<RunReport, CliError> {
    let graph = build_graph(cached(cache, STOPS_KEY)?, cached(cache, ROUTES_KEY)?)?;
    let start = resolve_stop(&graph, &config.start)?;
    let goal = resolve_stop(&graph, &config.goal)?;

    let mut astar = AStar::with_heuristic(Box::new(EuclideanHeuristic::with_weight(
        config.heuristic_weight,
    )));
    let outcome = astar.search(&graph, start, goal)?;
    info!(
        "A* from {} to {}: {} steps in {:?}",
        config.start,
        config.goal,
        outcome.trace.len(),
        outcome.metrics.execution_time
    );

    if config.verify {
        verify_trace(&graph, astar.heuristic(), &outcome)?;
        info!("Trace verified");
    }

    let route = outcome.route();
    if !outcome.reached_goal {
        warn!("{} is not reachable from {}", config.goal, config.start);
    }

    let deriver = FrameDeriver::new(config.style.clone());
    let frames = deriver.derive_with_route(&graph, &outcome);

    let mut sink = JsonFrameSink::new(&config.frames_dir)?.with_pretty(config.pretty_frames);
    SceneDescriptor::from_graph(&graph, deriver.style())
        .with_endpoints(start, goal)
        .write_to(config.frames_dir.join(SCENE_FILE))?;
    let export = export_frames(
        &mut sink,
        &frames,
        ExportOptions {
            skip_until: config.skip_until,
        },
    );

    if let Some(path) = &config.trace_out {
        outcome.trace.write_to(path)?;
        info!("Trace written to {}", path.display());
    }

    Ok(RunReport {
        steps: outcome.trace.len(),
        reached_goal: outcome.reached_goal,
        route_len: route.len(),
        export,
    })
}
