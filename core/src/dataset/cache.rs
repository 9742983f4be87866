//! On-disk cache of raw API responses
//!
//! The cache is a single JSON object mapping a response key to the raw
//! document. It is loaded once, mutated in memory and written back when
//! flushed or dropped. A missing or unreadable file yields an empty cache.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde_json::{Map, Value};

/// Cache key of the stops document
pub const STOPS_KEY: &str = "stops_data";
/// Cache key of the routes document
pub const ROUTES_KEY: &str = "routes_data";

/// Cache error
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Response cache backed by a JSON file
#[derive(Debug)]
pub struct ResponseCache {
    path: PathBuf,
    entries: Map<String, Value>,
    dirty: bool,
}

impl ResponseCache {
    /// Opens the cache at `path`.
    ///
    /// A missing file starts an empty cache. A file that is not a JSON object
    /// is ignored with a warning and will be overwritten on the next flush.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = match File::open(&path) {
            Ok(file) => match serde_json::from_reader::<_, Map<String, Value>>(BufReader::new(file)) {
                Ok(entries) => {
                    info!("Cache loaded from {} ({} entries)", path.display(), entries.len());
                    entries
                }
                Err(e) => {
                    warn!("Cache file {} is invalid ({}), using empty cache", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Cache file {} does not exist, starting with empty cache", path.display());
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let hit = self.entries.get(key);
        debug!("Cache {} for '{}'", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    pub fn put(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
        self.dirty = true;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Empties the cache and deletes its file
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.entries.clear();
        self.dirty = false;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!("Cache cleared");
        Ok(())
    }

    /// Writes the cache back if it changed since the last load or flush
    pub fn flush(&mut self) -> Result<(), CacheError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.entries)?;
        writer.flush()?;
        self.dirty = false;
        info!("Cache saved to {}", self.path.display());
        Ok(())
    }
}

impl Drop for ResponseCache {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            error!("Failed to save cache to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::open(dir.path().join("api_cache.json")).unwrap();

        assert!(cache.is_empty());
        assert!(cache.get(STOPS_KEY).is_none());
    }

    #[test]
    fn test_put_flush_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_cache.json");

        let mut cache = ResponseCache::open(&path).unwrap();
        cache.put(STOPS_KEY, json!({"result": []}));
        cache.flush().unwrap();
        drop(cache);

        let reloaded = ResponseCache::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(STOPS_KEY), Some(&json!({"result": []})));
    }

    #[test]
    fn test_drop_flushes_pending_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        {
            let mut cache = ResponseCache::open(&path).unwrap();
            cache.put(ROUTES_KEY, json!({"result": {}}));
        }

        assert!(path.exists());
        assert!(ResponseCache::open(&path).unwrap().contains(ROUTES_KEY));
    }

    #[test]
    fn test_invalid_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_cache.json");
        fs::write(&path, "{ not json").unwrap();

        let cache = ResponseCache::open(&path).unwrap();
        assert!(cache.is_empty());
        drop(cache);

        // Nothing changed, so the broken file is left as it was
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_cache.json");

        let mut cache = ResponseCache::open(&path).unwrap();
        cache.put("k", json!(1));
        cache.flush().unwrap();
        assert!(path.exists());

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert!(!path.exists());
        drop(cache);
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_marks_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_cache.json");
        fs::write(&path, r#"{"a": 1, "b": 2}"#).unwrap();

        let mut cache = ResponseCache::open(&path).unwrap();
        assert_eq!(cache.remove("a"), Some(json!(1)));
        assert_eq!(cache.remove("missing"), None);
        cache.flush().unwrap();

        let reloaded = ResponseCache::open(&path).unwrap();
        assert!(!reloaded.contains("a"));
        assert!(reloaded.contains("b"));
    }
}
