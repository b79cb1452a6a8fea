// SPDX-License-Identifier: MIT

//! Read-only interface over a git workspace. Every method returns the
//! conservative neutral value (`None` / empty / `false`) for a non-git or
//! invalid path rather than propagating an error — callers use this to
//! decide cache validity, never to drive a transaction.

use crate::subprocess::{run_git, stdout_trimmed, GIT_COMMAND_TIMEOUT};
use chrono::Utc;
use scanforge_core::{short_commit as short_commit_of, RepositoryStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMetadata {
    pub sha: String,
    pub short_sha: String,
    pub author: String,
    pub message: String,
}

pub struct CommitTracker;

impl CommitTracker {
    pub async fn is_git_repository(path: &Path) -> bool {
        matches!(
            run_git(path, &["rev-parse", "--is-inside-work-tree"], GIT_COMMAND_TIMEOUT).await,
            Ok(output) if output.status.success()
        )
    }

    pub async fn repository_commit(path: &Path) -> Option<String> {
        let output = run_git(path, &["rev-parse", "HEAD"], GIT_COMMAND_TIMEOUT).await.ok()?;
        if !output.status.success() {
            return None;
        }
        let sha = stdout_trimmed(&output);
        (!sha.is_empty()).then_some(sha)
    }

    pub async fn short_commit(path: &Path) -> Option<String> {
        Self::repository_commit(path).await.map(|sha| short_commit_of(&sha))
    }

    /// `true` when `last_commit` is absent, differs from the current
    /// commit, or the path isn't a git repository at all — i.e. "assume a
    /// change happened" is the conservative default for cache validity.
    pub async fn has_changed(path: &Path, last_commit: Option<&str>) -> bool {
        match Self::repository_commit(path).await {
            Some(current) => last_commit.map_or(true, |last| last != current),
            None => true,
        }
    }

    pub async fn changed_files(path: &Path, from_commit: &str) -> Vec<String> {
        let range = format!("{from_commit}..HEAD");
        match run_git(path, &["diff", "--name-only", &range], GIT_COMMAND_TIMEOUT).await {
            Ok(output) if output.status.success() => {
                stdout_trimmed(&output).lines().map(str::to_string).collect()
            }
            _ => Vec::new(),
        }
    }

    pub async fn commit_metadata(path: &Path, commit: &str) -> Option<CommitMetadata> {
        let format = "%H%x1f%an%x1f%s";
        let output = run_git(path, &["log", "-1", &format!("--format={format}"), commit], GIT_COMMAND_TIMEOUT)
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let line = stdout_trimmed(&output);
        let mut parts = line.splitn(3, '\u{1f}');
        let sha = parts.next()?.to_string();
        let author = parts.next().unwrap_or_default().to_string();
        let message = parts.next().unwrap_or_default().to_string();
        Some(CommitMetadata {
            short_sha: short_commit_of(&sha),
            sha,
            author,
            message,
        })
    }

    pub async fn branch_name(path: &Path) -> Option<String> {
        let output = run_git(path, &["rev-parse", "--abbrev-ref", "HEAD"], GIT_COMMAND_TIMEOUT).await.ok()?;
        if !output.status.success() {
            return None;
        }
        let name = stdout_trimmed(&output);
        (!name.is_empty() && name != "HEAD").then_some(name)
    }

    pub async fn has_uncommitted_changes(path: &Path) -> bool {
        match run_git(path, &["status", "--porcelain"], GIT_COMMAND_TIMEOUT).await {
            Ok(output) if output.status.success() => !stdout_trimmed(&output).is_empty(),
            _ => false,
        }
    }

    pub async fn remote_url(path: &Path, name: Option<&str>) -> Option<String> {
        let remote = name.unwrap_or("origin");
        let output = run_git(path, &["remote", "get-url", remote], GIT_COMMAND_TIMEOUT).await.ok()?;
        if !output.status.success() {
            return None;
        }
        let url = stdout_trimmed(&output);
        (!url.is_empty()).then_some(url)
    }

    pub async fn commit_count(path: &Path) -> u64 {
        match run_git(path, &["rev-list", "--count", "HEAD"], GIT_COMMAND_TIMEOUT).await {
            Ok(output) if output.status.success() => stdout_trimmed(&output).parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub async fn repository_status(path: &Path) -> RepositoryStatus {
        let scanned_at = Utc::now();
        if !Self::is_git_repository(path).await {
            return RepositoryStatus::not_a_repository(scanned_at);
        }

        let current_commit = Self::repository_commit(path).await;
        let short_commit_value = current_commit.as_deref().map(short_commit_of).unwrap_or_default();
        RepositoryStatus {
            is_git_repository: true,
            current_commit,
            short_commit: short_commit_value,
            branch: Self::branch_name(path).await,
            has_uncommitted_changes: Self::has_uncommitted_changes(path).await,
            remote_url: Self::remote_url(path, None).await,
            scanned_at,
        }
    }

    pub async fn commit_history(path: &Path, limit: usize) -> Vec<CommitMetadata> {
        let format = "%H%x1f%an%x1f%s";
        let limit_arg = limit.max(1).to_string();
        let output = match run_git(
            path,
            &["log", &format!("-{limit_arg}"), &format!("--format={format}")],
            GIT_COMMAND_TIMEOUT,
        )
        .await
        {
            Ok(output) if output.status.success() => output,
            _ => return Vec::new(),
        };

        stdout_trimmed(&output)
            .lines()
            .filter_map(|line| {
                let mut parts = line.splitn(3, '\u{1f}');
                let sha = parts.next()?.to_string();
                let author = parts.next().unwrap_or_default().to_string();
                let message = parts.next().unwrap_or_default().to_string();
                Some(CommitMetadata {
                    short_sha: short_commit_of(&sha),
                    sha,
                    author,
                    message,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "commit_tracker_tests.rs"]
mod tests;
