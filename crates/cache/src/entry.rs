// SPDX-License-Identifier: MIT

//! Stored cache entry shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub cached_at: DateTime<Utc>,
    pub repository_path: String,
    pub scan_type: String,
    #[serde(default)]
    pub total_duplicates: u64,
    #[serde(default)]
    pub total_suggestions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub scan_result: serde_json::Value,
    pub metadata: CacheMetadata,
    pub repository_path: String,
}

/// Age breakdown attached to a cache hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheAge {
    pub cached_at: DateTime<Utc>,
    pub age_seconds: i64,
    pub age_hours: f64,
    pub age_days: f64,
}

impl CacheAge {
    pub fn since(cached_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let age_seconds = (now - cached_at).num_seconds().max(0);
        Self {
            cached_at,
            age_seconds,
            age_hours: age_seconds as f64 / 3600.0,
            age_days: age_seconds as f64 / 86_400.0,
        }
    }
}

/// `cache_metadata` block attached to a scan result on a cache hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHitMetadata {
    pub from_cache: bool,
    #[serde(flatten)]
    pub age: CacheAge,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub repositories: usize,
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
