// SPDX-License-Identifier: MIT

//! Cache-vs-compute decision for a scan request, and the orchestration
//! that ties `ScanCache`, `PatternDetector`, and the repository's git
//! status together.

use crate::detector::{PatternDetector, ScanOptions, ScanRequest};
use crate::error::HandlerError;
use crate::result::ScanResult;
use scanforge_cache::ScanCache;
use scanforge_core::{Clock, Event, RepositoryStatus, NO_GIT_SENTINEL};
use tracing::debug;

/// Observer hook for cache hit/miss events; `None` when the caller has no
/// use for them (most unit tests).
pub type EventSink<'a> = Option<&'a (dyn Fn(Event) + Send + Sync)>;

/// Scanner-service-level defaults, distinct from the per-request `ScanOptions`.
#[derive(Debug, Clone, Default)]
pub struct ScanServiceConfig {
    pub force_refresh: bool,
    pub track_uncommitted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatusReason {
    NotAGitRepository,
    Disabled,
    UncommittedChanges,
    Miss,
}

impl CacheStatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatusReason::NotAGitRepository => "not_a_git_repository",
            CacheStatusReason::Disabled => "disabled",
            CacheStatusReason::UncommittedChanges => "uncommitted_changes",
            CacheStatusReason::Miss => "miss",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub cached: bool,
    pub reason: Option<CacheStatusReason>,
}

/// `true` iff the repository's git state, the per-request options, and the
/// service config all permit reading from cache.
pub fn should_use_cache(
    cache_present: bool,
    repo_status: &RepositoryStatus,
    options: &ScanOptions,
    config: &ScanServiceConfig,
) -> bool {
    if !options.cache_enabled || !cache_present {
        return false;
    }
    if !repo_status.is_git_repository {
        return false;
    }
    if options.force_refresh || config.force_refresh {
        return false;
    }
    if config.track_uncommitted && repo_status.has_uncommitted_changes {
        return false;
    }
    true
}

fn commit_key(repo_status: &RepositoryStatus) -> &str {
    repo_status.current_commit.as_deref().unwrap_or(NO_GIT_SENTINEL)
}

/// Composes repo status, cache presence, and cache age into a status
/// report without performing a scan.
pub fn cache_status<C: Clock>(
    cache: &ScanCache<C>,
    repo_path: &str,
    repo_status: &RepositoryStatus,
    options: &ScanOptions,
    config: &ScanServiceConfig,
) -> CacheStatus {
    if !repo_status.is_git_repository {
        return CacheStatus {
            cached: false,
            reason: Some(CacheStatusReason::NotAGitRepository),
        };
    }
    if !should_use_cache(true, repo_status, options, config) {
        let reason = if !options.cache_enabled {
            CacheStatusReason::Disabled
        } else {
            CacheStatusReason::UncommittedChanges
        };
        return CacheStatus { cached: false, reason: Some(reason) };
    }

    let short_commit = commit_key(repo_status);
    if cache.is_cached(repo_path, short_commit) {
        CacheStatus { cached: true, reason: None }
    } else {
        CacheStatus { cached: false, reason: Some(CacheStatusReason::Miss) }
    }
}

/// Run a scan, consulting the cache first when eligible and writing a
/// fresh result back to it on miss. Cache write failures never fail the
/// scan — see `scanforge-cache`.
pub async fn scan<C: Clock>(
    repo_path: &str,
    repo_status: &RepositoryStatus,
    request: &ScanRequest,
    config: &ScanServiceConfig,
    cache: &ScanCache<C>,
    detector: &dyn PatternDetector,
    on_event: EventSink<'_>,
) -> Result<ScanResult, HandlerError> {
    let short_commit = commit_key(repo_status);
    let use_cache = should_use_cache(true, repo_status, &request.options, config);

    if use_cache {
        if let Some((cached_value, hit_metadata)) = cache.get_cached_scan(repo_path, short_commit) {
            debug!(repo_path, short_commit, "scan cache hit");
            if let Some(emit) = on_event {
                emit(Event::CacheHit { repository_path: repo_path.to_string(), short_commit: short_commit.to_string() });
            }
            let mut result: ScanResult =
                serde_json::from_value(cached_value).map_err(|e| HandlerError::MalformedOutput(e.to_string()))?;
            result.cache_metadata = Some(hit_metadata);
            return Ok(result);
        }
        if let Some(emit) = on_event {
            emit(Event::CacheMiss { repository_path: repo_path.to_string(), short_commit: short_commit.to_string() });
        }
    }

    let mut result = detector.detect(request).await?;
    result.cache_metadata = None;

    if use_cache {
        let serialized = serde_json::to_value(&result).map_err(|e| HandlerError::MalformedOutput(e.to_string()))?;
        let cached = cache.cache_scan(
            repo_path,
            short_commit,
            result.scan_type.as_str(),
            serialized,
            result.total_duplicates(),
            result.metrics.total_suggestions,
        );
        if !cached {
            debug!(repo_path, short_commit, "scan result computed but not cached");
        }
    }

    Ok(result)
}

#[cfg(test)]
#[path = "cached_scanner_tests.rs"]
mod tests;
