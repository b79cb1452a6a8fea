// SPDX-License-Identifier: MIT

use super::*;
use std::process::Command as StdCommand;
use tempfile::TempDir;

fn init_repo() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let run = |args: &[&str]| {
        StdCommand::new("git")
            .args(args)
            .current_dir(dir.path())
            .output()
            .expect("git invocation")
    };
    run(&["init", "-q", "-b", "main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "Test"]);
    std::fs::write(dir.path().join("README.md"), "hello\n").unwrap();
    run(&["add", "-A"]);
    run(&["commit", "-q", "-m", "initial commit"]);
    dir
}

#[tokio::test]
async fn is_git_repository_detects_initialized_repo() {
    let dir = init_repo();
    assert!(BranchManager::is_git_repository(dir.path()).await);
}

#[tokio::test]
async fn is_git_repository_is_false_for_plain_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!BranchManager::is_git_repository(dir.path()).await);
}

#[tokio::test]
async fn create_job_branch_then_cleanup_restores_original() {
    let dir = init_repo();
    let ctx = JobBranchContext {
        job_id: "job-1".to_string(),
        job_type: Some("scan".to_string()),
        description: Some("dedupe helpers".to_string()),
        base_branch: Some("main".to_string()),
        dry_run: true,
    };
    let branch = BranchManager::create_job_branch(dir.path(), &ctx, 1_700_000_000).await.unwrap();
    assert!(branch.branch_name.starts_with("scanforge/scan-dedupe-helpers-"));
    assert_eq!(BranchManager::current_branch(dir.path()).await, branch.branch_name);

    BranchManager::cleanup_branch(dir.path(), &branch.branch_name, &branch.original_branch, "main").await;
    assert_eq!(BranchManager::current_branch(dir.path()).await, branch.original_branch);
}

#[tokio::test]
async fn commit_changes_returns_empty_sha_when_nothing_changed() {
    let dir = init_repo();
    let ctx = CommitContext {
        job_id: "job-1".to_string(),
        message: "no-op".to_string(),
        description: None,
        changed_file_count: 0,
    };
    assert_eq!(BranchManager::commit_changes(dir.path(), &ctx).await, "");
}

#[tokio::test]
async fn commit_changes_commits_modified_files() {
    let dir = init_repo();
    std::fs::write(dir.path().join("README.md"), "updated\n").unwrap();
    let ctx = CommitContext {
        job_id: "job-1".to_string(),
        message: "Update readme".to_string(),
        description: None,
        changed_file_count: 1,
    };
    let sha = BranchManager::commit_changes(dir.path(), &ctx).await;
    assert!(!sha.is_empty());
}

#[tokio::test]
async fn push_branch_is_false_in_dry_run() {
    let dir = init_repo();
    assert!(!BranchManager::push_branch(dir.path(), "main", true).await);
}

#[test]
fn commit_message_includes_job_id_and_file_count() {
    let ctx = CommitContext {
        job_id: "job-1".to_string(),
        message: "Remove duplicate helpers".to_string(),
        description: Some("Consolidates three near-identical functions.".to_string()),
        changed_file_count: 3,
    };
    let message = build_commit_message(&ctx);
    assert!(message.contains("Job ID: job-1"));
    assert!(message.contains("Files changed: 3"));
    assert!(message.contains(ATTRIBUTION_TRAILER));
}
