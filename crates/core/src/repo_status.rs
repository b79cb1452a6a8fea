// SPDX-License-Identifier: MIT

//! Repository status snapshot produced by the Commit Tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel short-commit value for non-git directories.
pub const NO_GIT_SENTINEL: &str = "no-git";

/// Number of leading hex characters kept from a full commit SHA.
pub const SHORT_COMMIT_LEN: usize = 7;

/// Snapshot of a repository's git state at the moment it was examined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryStatus {
    pub is_git_repository: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_commit: Option<String>,
    pub short_commit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub has_uncommitted_changes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl RepositoryStatus {
    /// The conservative snapshot for a path that is not a git repository.
    pub fn not_a_repository(scanned_at: DateTime<Utc>) -> Self {
        Self {
            is_git_repository: false,
            current_commit: None,
            short_commit: NO_GIT_SENTINEL.to_string(),
            branch: None,
            has_uncommitted_changes: false,
            remote_url: None,
            scanned_at,
        }
    }
}

/// Truncate a full commit SHA to the cache-key short form.
pub fn short_commit(full: &str) -> String {
    full.chars().take(SHORT_COMMIT_LEN).collect()
}

#[cfg(test)]
#[path = "repo_status_tests.rs"]
mod tests;
