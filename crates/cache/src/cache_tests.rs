// SPDX-License-Identifier: MIT

use super::*;
use crate::error::CacheError;
use scanforge_core::FakeClock;
use std::sync::Arc;
use std::time::Duration;

fn cache() -> (ScanCache<FakeClock>, FakeClock) {
    let clock = FakeClock::default();
    let cache = ScanCache::new(clock.clone());
    (cache, clock)
}

struct FailingBackend;

impl CacheBackend for FailingBackend {
    fn get(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(None)
    }
    fn put(&self, _key: String, _entry: CacheEntry) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("backend offline".to_string()))
    }
    fn remove_by_repository(&self, _repository_path: &str) -> Result<usize, CacheError> {
        Ok(0)
    }
    fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
    fn recent_keys(&self, _limit: usize) -> Result<Vec<String>, CacheError> {
        Ok(Vec::new())
    }
    fn len(&self) -> Result<usize, CacheError> {
        Ok(0)
    }
}

#[test]
fn cache_then_get_hits_with_zero_age() {
    let (cache, _clock) = cache();
    assert!(cache.cache_scan("/repo", "abc1234", "intra-project", serde_json::json!({"dupes": []}), 0, 0));
    let (result, meta) = cache.get_cached_scan("/repo", "abc1234").unwrap();
    assert_eq!(result, serde_json::json!({"dupes": []}));
    assert!(meta.from_cache);
    assert_eq!(meta.age.age_seconds, 0);
}

#[test]
fn cache_scan_returns_false_when_the_backend_rejects_the_write() {
    let cache = ScanCache::with_backend(Arc::new(FailingBackend), FakeClock::default());
    assert!(!cache.cache_scan("/repo", "abc1234", "intra-project", serde_json::json!({}), 0, 0));
}

#[test]
fn miss_when_commit_differs() {
    let (cache, _clock) = cache();
    cache.cache_scan("/repo", "abc1234", "intra-project", serde_json::json!({}), 0, 0);
    assert!(cache.get_cached_scan("/repo", "def5678").is_none());
}

#[test]
fn age_advances_with_clock() {
    let (cache, clock) = cache();
    cache.cache_scan("/repo", "abc1234", "intra-project", serde_json::json!({}), 0, 0);
    clock.advance(Duration::from_secs(3600));
    let age = cache.cache_age("/repo", "abc1234").unwrap();
    assert_eq!(age.age_seconds, 3600);
}

#[test]
fn invalidate_cache_drops_all_commits_for_repo() {
    let (cache, _clock) = cache();
    cache.cache_scan("/repo", "abc1234", "intra-project", serde_json::json!({}), 0, 0);
    cache.cache_scan("/repo", "def5678", "intra-project", serde_json::json!({}), 0, 0);
    let removed = cache.invalidate_cache("/repo");
    assert_eq!(removed, 2);
    assert!(!cache.is_cached("/repo", "abc1234"));
    assert!(!cache.is_cached("/repo", "def5678"));
}

#[test]
fn clear_all_empties_stats() {
    let (cache, _clock) = cache();
    cache.cache_scan("/repo", "abc1234", "intra-project", serde_json::json!({}), 0, 0);
    cache.clear_all();
    assert_eq!(cache.stats().total_entries, 0);
}
