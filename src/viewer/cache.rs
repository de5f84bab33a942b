//! Last-known-position cache at ~/.quadra/position.json.
//!
//! TTL: 5 minutes. A fix older than that is stale for proximity results
//! and the resolver moves on to a live lookup.

use super::types::{PositionSource, ViewerPosition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CACHE_TTL_MS: i64 = 5 * 60 * 1000;

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    lat: f64,
    lon: f64,
    timestamp: i64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    source_name: Option<String>,
}

/// The position cache: at most one entry, the last fix.
pub struct PositionCache {
    path: PathBuf,
    entry: Option<CacheEntry>,
}

impl PositionCache {
    /// Load from the default location (~/.quadra/position.json).
    pub fn load() -> Self {
        let path = Self::default_path();
        let entry = Self::read_file(&path);
        Self { path, entry }
    }

    /// Load from a specific path (for testing).
    pub fn load_from(path: PathBuf) -> Self {
        let entry = Self::read_file(&path);
        Self { path, entry }
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".quadra")
            .join("position.json")
    }

    fn read_file(path: &PathBuf) -> Option<CacheEntry> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// The last fix, if still fresh. Returns None when missing or expired.
    pub fn get(&self) -> Option<ViewerPosition> {
        let entry = self.entry.as_ref()?;

        let now = chrono::Utc::now().timestamp_millis();
        if now - entry.timestamp > CACHE_TTL_MS {
            return None; // expired
        }

        Some(ViewerPosition {
            lat: entry.lat,
            lon: entry.lon,
            label: entry.label.clone(),
            source: PositionSource::Cache,
        })
    }

    /// Store a fix and persist to disk.
    pub fn put(&mut self, position: &ViewerPosition) {
        self.entry = Some(CacheEntry {
            lat: position.lat,
            lon: position.lon,
            timestamp: chrono::Utc::now().timestamp_millis(),
            label: position.label.clone(),
            source_name: Some(position.source.to_string()),
        });
        self.persist();
    }

    fn persist(&self) {
        if let Some(entry) = &self.entry {
            if let Some(parent) = self.path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(entry) {
                let _ = fs::write(&self.path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (PositionCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("position.json");
        (PositionCache::load_from(path), dir)
    }

    fn sample_position() -> ViewerPosition {
        ViewerPosition {
            lat: -23.5505,
            lon: -46.6333,
            label: Some("São Paulo, Brazil".into()),
            source: PositionSource::IpApi,
        }
    }

    #[test]
    fn test_put_get() {
        let (mut cache, _dir) = test_cache();
        cache.put(&sample_position());

        let result = cache.get().unwrap();
        assert_eq!(result.source, PositionSource::Cache);
        assert!((result.lat - -23.5505).abs() < 1e-9);
        assert_eq!(result.label, Some("São Paulo, Brazil".to_string()));
    }

    #[test]
    fn test_miss_when_empty() {
        let (cache, _dir) = test_cache();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_expired_entry_is_stale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("position.json");
        // Timestamp far in the past
        let stale = r#"{
            "lat": -23.5505,
            "lon": -46.6333,
            "timestamp": 1000
        }"#;
        fs::write(&path, stale).unwrap();

        let cache = PositionCache::load_from(path);
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_persistence_across_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("position.json");

        {
            let mut cache = PositionCache::load_from(path.clone());
            cache.put(&sample_position());
        }

        let cache2 = PositionCache::load_from(path);
        let result = cache2.get().unwrap();
        assert!((result.lon - -46.6333).abs() < 1e-9);
    }

    #[test]
    fn test_entry_without_label_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("position.json");
        let now = chrono::Utc::now().timestamp_millis();
        let json = format!(
            r#"{{ "lat": -22.9068, "lon": -43.1729, "timestamp": {} }}"#,
            now
        );
        fs::write(&path, json).unwrap();

        let cache = PositionCache::load_from(path);
        let result = cache.get().unwrap();
        assert!(result.label.is_none());
        assert_eq!(result.source, PositionSource::Cache);
    }
}
