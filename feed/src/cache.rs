//! On-disk cache of fetched event feeds.
//!
//! One JSON file per user, `{dir}/{username}.json`:
//!
//! ```json
//! {"timestamp": 1717243200, "events": [ ... ]}
//! ```
//!
//! `timestamp` is the Unix time of the fetch. An entry is fresh while
//! `now - timestamp < ttl`. Unreadable or corrupt files count as a miss.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default freshness window in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Errors that can occur while writing or removing cache entries.
#[derive(Error, Debug)]
pub enum CacheError {
    /// File system I/O error.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization failed.
    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The username cannot be used as a file name.
    #[error("invalid cache key '{0}'")]
    InvalidKey(String),
}

/// Contents of one cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unix time (seconds) of the fetch.
    pub timestamp: i64,

    /// Raw events as returned by the API.
    pub events: Vec<Value>,
}

impl CacheEntry {
    /// Returns `true` if the entry is younger than `ttl` at `now`.
    ///
    /// An age too large for `i64` saturates, so absurd timestamps are stale.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.timestamp().saturating_sub(self.timestamp);
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        age < ttl
    }
}

/// Per-user feed cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct FeedCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FeedCache {
    /// Creates a cache in `dir`. The directory is created on first store.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// The cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The freshness window.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the cache file for `username`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidKey`] if `username` would escape the
    /// cache directory or is empty.
    pub fn path_for(&self, username: &str) -> Result<PathBuf, CacheError> {
        let valid = !username.is_empty()
            && !username.starts_with('.')
            && !username.contains(['/', '\\']);
        if !valid {
            return Err(CacheError::InvalidKey(username.to_string()));
        }
        Ok(self.dir.join(format!("{username}.json")))
    }

    /// Returns the cached events if the entry is fresh at `now`.
    #[must_use]
    pub fn load(&self, username: &str, now: DateTime<Utc>) -> Option<Vec<Value>> {
        let entry = self.read_entry(username)?;
        if entry.is_fresh(now, self.ttl) {
            debug!(username, timestamp = entry.timestamp, "Cache hit");
            Some(entry.events)
        } else {
            debug!(username, timestamp = entry.timestamp, "Cache entry expired");
            None
        }
    }

    /// Returns the cached events regardless of age.
    #[must_use]
    pub fn load_stale(&self, username: &str) -> Option<Vec<Value>> {
        self.read_entry(username).map(|entry| entry.events)
    }

    /// Writes `events` as the entry for `username`, stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the directory cannot be created or the file
    /// cannot be written.
    pub fn store(
        &self,
        username: &str,
        events: &[Value],
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let path = self.path_for(username)?;

        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let entry = CacheEntry {
            timestamp: now.timestamp(),
            events: events.to_vec(),
        };
        let contents = serde_json::to_vec(&entry)?;

        fs::write(&path, contents).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), events = events.len(), "Cache stored");
        Ok(())
    }

    /// Removes the entry for `username`. A missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the file exists but cannot be removed.
    pub fn invalidate(&self, username: &str) -> Result<(), CacheError> {
        let path = self.path_for(username)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    fn read_entry(&self, username: &str) -> Option<CacheEntry> {
        let path = self.path_for(username).ok()?;
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(path = %path.display(), error = %e, "Cache read failed");
                }
                return None;
            }
        };

        match serde_json::from_slice(&contents) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring corrupt cache entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn cache(dir: &TempDir) -> FeedCache {
        FeedCache::new(dir.path().join("cache"), Duration::from_secs(DEFAULT_TTL_SECS))
    }

    fn sample() -> Vec<Value> {
        vec![json!({"type": "WatchEvent", "repo": {"name": "octocat/Hello-World"}})]
    }

    #[test]
    fn store_then_load_within_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.store("octocat", &sample(), now()).unwrap();

        let later = now() + chrono::Duration::seconds(299);
        assert_eq!(cache.load("octocat", later), Some(sample()));
    }

    #[test]
    fn entry_expires_at_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.store("octocat", &sample(), now()).unwrap();

        let expired = now() + chrono::Duration::seconds(300);
        assert_eq!(cache.load("octocat", expired), None);
        assert_eq!(cache.load_stale("octocat"), Some(sample()));
    }

    #[test]
    fn file_layout_matches_format() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.store("octocat", &sample(), now()).unwrap();

        let path = dir.path().join("cache").join("octocat.json");
        let raw: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(raw["timestamp"], json!(now().timestamp()));
        assert_eq!(raw["events"], json!(sample()));
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        assert_eq!(cache.load("nobody", now()), None);
        assert_eq!(cache.load_stale("nobody"), None);
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        fs::create_dir_all(cache.dir()).unwrap();
        fs::write(cache.dir().join("octocat.json"), b"{not json").unwrap();

        assert_eq!(cache.load("octocat", now()), None);
        assert_eq!(cache.load_stale("octocat"), None);
    }

    #[test]
    fn invalidate_removes_entry_and_ignores_missing() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.store("octocat", &sample(), now()).unwrap();
        cache.invalidate("octocat").unwrap();
        assert_eq!(cache.load_stale("octocat"), None);

        cache.invalidate("octocat").unwrap();
    }

    #[test]
    fn path_traversal_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        for key in ["", "../x", "a/b", ".hidden"] {
            assert!(matches!(cache.path_for(key), Err(CacheError::InvalidKey(_))), "{key:?}");
        }
        assert!(cache.store("../escape", &sample(), now()).is_err());
    }

    #[test]
    fn entry_from_the_future_is_fresh() {
        let entry = CacheEntry {
            timestamp: now().timestamp() + 60,
            events: Vec::new(),
        };
        assert!(entry.is_fresh(now(), Duration::from_secs(DEFAULT_TTL_SECS)));
    }

    #[test]
    fn entry_from_the_distant_past_is_stale() {
        let entry: CacheEntry =
            serde_json::from_value(json!({"timestamp": i64::MIN, "events": []})).unwrap();
        assert!(!entry.is_fresh(now(), Duration::from_secs(DEFAULT_TTL_SECS)));
    }

    #[test]
    fn extreme_timestamp_on_disk_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        fs::create_dir_all(cache.dir()).unwrap();
        let entry = json!({"timestamp": i64::MIN, "events": sample()});
        fs::write(cache.dir().join("octocat.json"), entry.to_string()).unwrap();

        assert_eq!(cache.load("octocat", now()), None);
        assert_eq!(cache.load_stale("octocat"), Some(sample()));
    }
}
