//! Application configuration
//!
//! Settings come from an optional JSON file; command-line flags override
//! whatever the file sets. Every field has a default, so an empty file (or
//! none at all) is a valid configuration.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use transit_visualization::{FrameStyle, StyleError};

use crate::args::Cli;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid frame style: {0}")]
    Style(#[from] StyleError),

    #[error("Start and goal must be set")]
    MissingEndpoint,

    #[error("Heuristic weight must be finite and non-negative, got {0}")]
    InvalidHeuristicWeight(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Raw API responses cache
    pub cache_path: PathBuf,
    /// Start stop key, `"{zespol}:{slupek}"`
    pub start: String,
    /// Goal stop key
    pub goal: String,
    pub frames_dir: PathBuf,
    /// Frames before this step are not exported
    pub skip_until: usize,
    /// Where to write the full search trace, if anywhere
    pub trace_out: Option<PathBuf>,
    /// Check the produced trace before exporting it
    pub verify: bool,
    /// Scale of the straight-line estimate; above 1.0 the route may not be shortest
    pub heuristic_weight: f64,
    /// Indented frame JSON
    pub pretty_frames: bool,
    pub style: FrameStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("api_cache.json"),
            // Metro Racławicka to Bandurskiego
            start: "1238:01".to_string(),
            goal: "1542:01".to_string(),
            frames_dir: PathBuf::from("frames"),
            skip_until: 0,
            trace_out: None,
            verify: false,
            heuristic_weight: 1.0,
            pretty_frames: false,
            style: FrameStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Applies command-line overrides
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(cache) = &cli.cache {
            self.cache_path = cache.clone();
        }
        if let Some(start) = &cli.start {
            self.start = start.clone();
        }
        if let Some(goal) = &cli.goal {
            self.goal = goal.clone();
        }
        if let Some(dir) = &cli.frames_dir {
            self.frames_dir = dir.clone();
        }
        if let Some(skip) = cli.skip_until {
            self.skip_until = skip;
        }
        if let Some(trace_out) = &cli.trace_out {
            self.trace_out = Some(trace_out.clone());
        }
        if let Some(weight) = cli.heuristic_weight {
            self.heuristic_weight = weight;
        }
        self.verify |= cli.verify;
        self.pretty_frames |= cli.pretty_frames;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start.trim().is_empty() || self.goal.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if !self.heuristic_weight.is_finite() || self.heuristic_weight < 0.0 {
            return Err(ConfigError::InvalidHeuristicWeight(self.heuristic_weight));
        }
        self.style.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_or_default(None).unwrap();
        assert_eq!(config.cache_path, PathBuf::from("api_cache.json"));
        assert_eq!(config.frames_dir, PathBuf::from("frames"));
        assert_eq!(config.start, "1238:01");
        assert_eq!(config.goal, "1542:01");
        assert_eq!(config.heuristic_weight, 1.0);
        assert!(!config.pretty_frames);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r##"{"goal": "7006:01", "verify": true, "style": {"visited": "#ff00ff"}}"##,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.goal, "7006:01");
        assert!(config.verify);
        assert_eq!(config.style.visited.to_hex(), "#ff00ff");
        assert_eq!(config.start, "1238:01");
        assert_eq!(config.style.fade_speed, FrameStyle::default().fade_speed);
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = AppConfig {
            skip_until: 4,
            ..AppConfig::default()
        };
        let cli = Cli::parse_from([
            "transit-astar",
            "--start",
            "1:01",
            "--frames-dir",
            "out",
            "--verify",
            "--heuristic-weight",
            "1.5",
            "--pretty-frames",
        ]);
        config.apply_overrides(&cli);

        assert_eq!(config.start, "1:01");
        assert_eq!(config.frames_dir, PathBuf::from("out"));
        assert_eq!(config.skip_until, 4);
        assert!(config.verify);
        assert!(config.pretty_frames);
        assert_eq!(config.heuristic_weight, 1.5);
        assert_eq!(config.goal, "1542:01");
    }

    #[test]
    fn test_bad_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"skip_until\": \"soon\"}").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validation() {
        let config = AppConfig {
            goal: " ".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingEndpoint)));

        for weight in [-0.5, f64::INFINITY, f64::NAN] {
            let config = AppConfig {
                heuristic_weight: weight,
                ..AppConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidHeuristicWeight(_))
            ));
        }

        let mut config = AppConfig::default();
        config.style.fade_speed = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Style(_))));
    }
}
