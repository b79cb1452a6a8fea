// SPDX-License-Identifier: MIT

//! Low-level git wrapper. Every operation returns a conservative falsy
//! value for invalid or non-git paths rather than propagating an error —
//! only [`BranchManager::create_job_branch`] and
//! [`BranchManager::commit_changes`] can meaningfully fail, and even those
//! report failure through their return shape rather than panicking.

use crate::branch_naming::derive_branch_name;
use crate::context::{CommitContext, JobBranch, JobBranchContext, PrContext};
use crate::error::GitError;
use crate::subprocess::{run_git, stdout_trimmed, GIT_COMMAND_TIMEOUT, GIT_PUSH_TIMEOUT};
use std::path::Path;

const DEFAULT_BASE_BRANCH: &str = "main";
const ATTRIBUTION_TRAILER: &str = "Automated-by: scanforge";

pub struct BranchManager;

impl BranchManager {
    pub async fn is_git_repository(path: &Path) -> bool {
        matches!(
            run_git(path, &["rev-parse", "--is-inside-work-tree"], GIT_COMMAND_TIMEOUT).await,
            Ok(output) if output.status.success()
        )
    }

    pub async fn has_changes(path: &Path) -> bool {
        match run_git(path, &["status", "--porcelain"], GIT_COMMAND_TIMEOUT).await {
            Ok(output) if output.status.success() => !stdout_trimmed(&output).is_empty(),
            _ => false,
        }
    }

    pub async fn changed_files(path: &Path) -> Vec<String> {
        match run_git(path, &["status", "--porcelain"], GIT_COMMAND_TIMEOUT).await {
            Ok(output) if output.status.success() => stdout_trimmed(&output)
                .lines()
                .filter_map(|line| line.get(3..).map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub async fn current_branch(path: &Path) -> String {
        match run_git(path, &["rev-parse", "--abbrev-ref", "HEAD"], GIT_COMMAND_TIMEOUT).await {
            Ok(output) if output.status.success() => stdout_trimmed(&output),
            _ => String::new(),
        }
    }

    /// Check out the base branch, pull (skipped in dry-run), create the job
    /// branch, and switch to it.
    pub async fn create_job_branch(
        path: &Path,
        ctx: &JobBranchContext,
        epoch_ms: i64,
    ) -> Result<JobBranch, GitError> {
        if !Self::is_git_repository(path).await {
            return Err(GitError::NotARepository {
                path: path.display().to_string(),
            });
        }

        let original_branch = Self::current_branch(path).await;
        let base_branch = ctx.base_branch.clone().unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());
        let branch_name = derive_branch_name(ctx.job_type.as_deref(), ctx.description.as_deref(), epoch_ms);

        let checkout = run_git(path, &["checkout", &base_branch], GIT_COMMAND_TIMEOUT).await;
        if !matches!(checkout, Ok(o) if o.status.success()) {
            return Err(GitError::MissingBaseBranch {
                path: path.display().to_string(),
                branch: base_branch,
            });
        }

        if !ctx.dry_run {
            let _ = run_git(path, &["pull", "--ff-only"], GIT_PUSH_TIMEOUT).await;
        }

        let create = run_git(path, &["checkout", "-b", &branch_name], GIT_COMMAND_TIMEOUT).await;
        match create {
            Ok(o) if o.status.success() => Ok(JobBranch {
                branch_name,
                original_branch,
            }),
            Ok(o) => Err(GitError::BranchCreation(String::from_utf8_lossy(&o.stderr).trim().to_string())),
            Err(e) => Err(GitError::BranchCreation(e.to_string())),
        }
    }

    /// Returns the commit sha, or an empty string when there was nothing
    /// to commit.
    pub async fn commit_changes(path: &Path, ctx: &CommitContext) -> String {
        if !Self::has_changes(path).await {
            return String::new();
        }

        if matches!(run_git(path, &["add", "-A"], GIT_COMMAND_TIMEOUT).await, Ok(o) if !o.status.success()) {
            return String::new();
        }

        let message = build_commit_message(ctx);
        let commit = run_git(path, &["commit", "-m", &message], GIT_COMMAND_TIMEOUT).await;
        if !matches!(commit, Ok(o) if o.status.success()) {
            return String::new();
        }

        match run_git(path, &["rev-parse", "HEAD"], GIT_COMMAND_TIMEOUT).await {
            Ok(o) if o.status.success() => stdout_trimmed(&o),
            _ => String::new(),
        }
    }

    pub async fn push_branch(path: &Path, branch: &str, dry_run: bool) -> bool {
        if dry_run {
            return false;
        }
        matches!(
            run_git(path, &["push", "-u", "origin", branch], GIT_PUSH_TIMEOUT).await,
            Ok(o) if o.status.success()
        )
    }

    /// `Some("dry-run-<branch>")` in dry-run mode (push and PR creation are
    /// both short-circuited, but the caller still sees a structurally valid
    /// result); otherwise shells out to `gh pr create` and returns the URL
    /// it prints, or `None` if that fails.
    pub async fn create_pull_request(path: &Path, ctx: &PrContext, dry_run: bool) -> Option<String> {
        if dry_run {
            return Some(format!("dry-run-{}", ctx.branch_name));
        }

        let mut args = vec!["pr", "create", "--head", &ctx.branch_name, "--title", &ctx.title, "--body", &ctx.body];
        for label in &ctx.labels {
            args.push("--label");
            args.push(label);
        }

        let mut cmd = tokio::process::Command::new("gh");
        cmd.args(&args).current_dir(path);
        match tokio::time::timeout(GIT_PUSH_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if url.is_empty() {
                    None
                } else {
                    Some(url)
                }
            }
            _ => None,
        }
    }

    /// Restore the original branch (falling back to `base_branch` if the
    /// restore itself fails) and delete the local job branch. Errors are
    /// swallowed; cleanup is best-effort by design.
    pub async fn cleanup_branch(path: &Path, branch: &str, original_branch: &str, base_branch: &str) {
        let target = if original_branch.is_empty() { base_branch } else { original_branch };
        let restored = run_git(path, &["checkout", target], GIT_COMMAND_TIMEOUT).await;
        if !matches!(restored, Ok(o) if o.status.success()) {
            let _ = run_git(path, &["checkout", base_branch], GIT_COMMAND_TIMEOUT).await;
        }
        let _ = run_git(path, &["branch", "-D", branch], GIT_COMMAND_TIMEOUT).await;
    }
}

fn build_commit_message(ctx: &CommitContext) -> String {
    let mut lines = vec![ctx.message.clone()];
    if let Some(description) = &ctx.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines.push(String::new());
    lines.push(format!("Job ID: {}", ctx.job_id));
    lines.push(format!("Files changed: {}", ctx.changed_file_count));
    lines.push(String::new());
    lines.push(ATTRIBUTION_TRAILER.to_string());
    lines.join("\n")
}

#[cfg(test)]
#[path = "branch_manager_tests.rs"]
mod tests;
