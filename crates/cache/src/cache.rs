// SPDX-License-Identifier: MIT

//! `ScanCache`: the public cache API composing key construction, entry
//! shapes, and a pluggable backend. Backend errors are swallowed here —
//! a cache outage degrades to "always miss", it never fails a scan.

use crate::backend::{CacheBackend, InMemoryBackend};
use crate::entry::{CacheAge, CacheEntry, CacheHitMetadata, CacheMetadata, CacheStats};
use crate::key::{cache_key, DEFAULT_PREFIX};
use scanforge_core::{Clock, SystemClock};
use std::sync::Arc;
use tracing::warn;

pub struct ScanCache<C: Clock = SystemClock> {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
    clock: C,
}

impl<C: Clock> ScanCache<C> {
    pub fn new(clock: C) -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
            prefix: DEFAULT_PREFIX.to_string(),
            clock,
        }
    }

    pub fn with_backend(backend: Arc<dyn CacheBackend>, clock: C) -> Self {
        Self {
            backend,
            prefix: DEFAULT_PREFIX.to_string(),
            clock,
        }
    }

    fn key(&self, repo_path: &str, short_commit: &str) -> String {
        cache_key(&self.prefix, repo_path, short_commit)
    }

    /// Store a scan result. Returns `true` once written, `false` on a
    /// backend error — a scan that cannot be cached has still completed
    /// successfully, but the caller can tell the write was silently lost.
    pub fn cache_scan(
        &self,
        repo_path: &str,
        short_commit: &str,
        scan_type: &str,
        scan_result: serde_json::Value,
        total_duplicates: u64,
        total_suggestions: u64,
    ) -> bool {
        let key = self.key(repo_path, short_commit);
        let entry = CacheEntry {
            scan_result,
            metadata: CacheMetadata {
                cached_at: self.clock.now(),
                repository_path: repo_path.to_string(),
                scan_type: scan_type.to_string(),
                total_duplicates,
                total_suggestions,
            },
            repository_path: repo_path.to_string(),
        };
        match self.backend.put(key, entry) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, repo_path, "failed to write scan cache entry");
                false
            }
        }
    }

    /// Fetch a cached scan result, if present, annotated with `cache_metadata`.
    pub fn get_cached_scan(
        &self,
        repo_path: &str,
        short_commit: &str,
    ) -> Option<(serde_json::Value, CacheHitMetadata)> {
        let key = self.key(repo_path, short_commit);
        let entry = match self.backend.get(&key) {
            Ok(entry) => entry?,
            Err(err) => {
                warn!(error = %err, repo_path, "failed to read scan cache entry");
                return None;
            }
        };
        let age = CacheAge::since(entry.metadata.cached_at, self.clock.now());
        let hit_metadata = CacheHitMetadata {
            from_cache: true,
            age,
        };
        Some((entry.scan_result, hit_metadata))
    }

    pub fn is_cached(&self, repo_path: &str, short_commit: &str) -> bool {
        let key = self.key(repo_path, short_commit);
        matches!(self.backend.get(&key), Ok(Some(_)))
    }

    pub fn cache_age(&self, repo_path: &str, short_commit: &str) -> Option<CacheAge> {
        let key = self.key(repo_path, short_commit);
        let entry = self.backend.get(&key).ok().flatten()?;
        Some(CacheAge::since(entry.metadata.cached_at, self.clock.now()))
    }

    pub fn cache_metadata(&self, repo_path: &str, short_commit: &str) -> Option<CacheMetadata> {
        let key = self.key(repo_path, short_commit);
        self.backend.get(&key).ok().flatten().map(|e| e.metadata)
    }

    /// Drop every cached scan for a repository, regardless of commit.
    /// Returns the number of entries removed; swallows backend errors.
    pub fn invalidate_cache(&self, repo_path: &str) -> usize {
        match self.backend.remove_by_repository(repo_path) {
            Ok(n) => n,
            Err(err) => {
                warn!(error = %err, repo_path, "failed to invalidate scan cache");
                0
            }
        }
    }

    pub fn list_cached_scans(&self, limit: usize) -> Vec<String> {
        self.backend.recent_keys(limit).unwrap_or_default()
    }

    pub fn stats(&self) -> CacheStats {
        let total_entries = self.backend.len().unwrap_or(0);
        CacheStats {
            total_entries,
            repositories: total_entries,
        }
    }

    pub fn clear_all(&self) {
        if let Err(err) = self.backend.clear() {
            warn!(error = %err, "failed to clear scan cache");
        }
    }

}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
