// SPDX-License-Identifier: MIT

//! Git Workflow Manager: wraps a job handler body in a
//! branch → work → commit → push → PR → cleanup transaction.

use crate::branch_manager::BranchManager;
use crate::context::{CommitContext, JobBranchContext, PrContext};
use crate::error::GitError;
use scanforge_core::GitMetadata;
use std::future::Future;
use std::path::Path;
use tracing::warn;

const DEFAULT_BASE_BRANCH: &str = "main";

/// Runs `handler` with the repository checked out onto a fresh job branch,
/// committing and (outside dry-run) pushing/opening a PR for whatever the
/// handler changed. Cleanup always runs once a branch has been created,
/// even when the handler or a later step fails; the handler's own error is
/// propagated unchanged.
pub async fn run_git_workflow<F, Fut, T>(
    path: &Path,
    ctx: JobBranchContext,
    epoch_ms: i64,
    commit_message: impl Into<String>,
    pr_title: impl Into<String>,
    pr_body: impl Into<String>,
    pr_labels: Vec<String>,
    handler: F,
) -> Result<(T, GitMetadata), GitError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, GitError>>,
{
    if !BranchManager::is_git_repository(path).await {
        return Err(GitError::NotARepository {
            path: path.display().to_string(),
        });
    }

    let dry_run = ctx.dry_run;
    let base_branch = ctx.base_branch.clone().unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());
    let job_id = ctx.job_id.clone();

    let branch = BranchManager::create_job_branch(path, &ctx, epoch_ms).await?;
    let mut metadata = GitMetadata {
        branch_name: Some(branch.branch_name.clone()),
        original_branch: Some(branch.original_branch.clone()),
        ..GitMetadata::default()
    };

    let handler_result = handler().await;

    let handler_output = match handler_result {
        Ok(value) => value,
        Err(err) => {
            BranchManager::cleanup_branch(path, &branch.branch_name, &branch.original_branch, &base_branch).await;
            return Err(err);
        }
    };

    if BranchManager::has_changes(path).await {
        let changed_files = BranchManager::changed_files(path).await;
        let commit_ctx = CommitContext {
            job_id: job_id.clone(),
            message: commit_message.into(),
            description: None,
            changed_file_count: changed_files.len(),
        };
        let commit_sha = BranchManager::commit_changes(path, &commit_ctx).await;
        if !commit_sha.is_empty() {
            metadata.commit_sha = Some(commit_sha);
            metadata.changed_files = changed_files;

            BranchManager::push_branch(path, &branch.branch_name, dry_run).await;
            let pr_ctx = PrContext {
                branch_name: branch.branch_name.clone(),
                title: pr_title.into(),
                body: pr_body.into(),
                labels: pr_labels,
            };
            metadata.pr_url = BranchManager::create_pull_request(path, &pr_ctx, dry_run).await;
        } else {
            warn!(job_id, branch = branch.branch_name, "commit_changes produced no sha despite detected changes");
        }
    }

    BranchManager::cleanup_branch(path, &branch.branch_name, &branch.original_branch, &base_branch).await;

    Ok((handler_output, metadata))
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
