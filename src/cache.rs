//! Short-lived on-disk cache of API responses.
//!
//! Running the tool repeatedly within a minute reuses the previous answer
//! instead of hitting the public API again. Entries are keyed by request
//! URL and stored as JSON in a single file. Any cache I/O problem is logged
//! and treated as a miss; the cache never fails a run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One cached response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct CacheEntry {
    stored_at: i64,
    body: String,
}

/// File-backed response cache with a fixed expiry.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
    expire_after_secs: u64,
    enabled: bool,
}

impl ResponseCache {
    /// Create a cache stored at `path` whose entries live `expire_after_secs`.
    pub fn new(path: impl Into<PathBuf>, expire_after_secs: u64) -> Self {
        Self {
            path: path.into(),
            expire_after_secs,
            enabled: true,
        }
    }

    /// Cache file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether reads and writes are still active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stop using the cache for the rest of the run.
    pub fn disable(&mut self) {
        if self.enabled {
            tracing::info!("Response cache disabled");
        }
        self.enabled = false;
    }

    /// Fresh cached body for `url`, if any.
    pub fn get(&self, url: &str) -> Option<String> {
        self.get_at(url, Utc::now().timestamp())
    }

    /// Store a body for `url`.
    pub fn put(&self, url: &str, body: &str) {
        self.put_at(url, body, Utc::now().timestamp())
    }

    fn get_at(&self, url: &str, now: i64) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let entry = self.read_entries().remove(url)?;
        let age = now.saturating_sub(entry.stored_at);
        if age >= 0 && (age as u64) < self.expire_after_secs {
            tracing::debug!("Cache hit for {} (age {}s)", url, age);
            Some(entry.body)
        } else {
            tracing::debug!("Cache entry for {} expired (age {}s)", url, age);
            None
        }
    }

    fn put_at(&self, url: &str, body: &str, now: i64) {
        if !self.enabled {
            return;
        }
        let expire = i64::try_from(self.expire_after_secs).unwrap_or(i64::MAX);
        let mut entries = self.read_entries();
        entries.retain(|_, e| now.saturating_sub(e.stored_at) < expire);
        entries.insert(
            url.to_string(),
            CacheEntry {
                stored_at: now,
                body: body.to_string(),
            },
        );

        let result = serde_json::to_string(&entries)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!("Failed to write cache {}: {}", self.path.display(), e);
        }
    }

    fn read_entries(&self) -> HashMap<String, CacheEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read cache {}: {}", self.path.display(), e);
                return HashMap::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt cache {}: {}", self.path.display(), e);
            HashMap::new()
        })
    }
}
