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

fn ctx(dry_run: bool) -> JobBranchContext {
    JobBranchContext {
        job_id: "job-1".to_string(),
        job_type: Some("scan".to_string()),
        description: Some("dedupe helpers".to_string()),
        base_branch: Some("main".to_string()),
        dry_run,
    }
}

#[tokio::test]
async fn dry_run_workflow_records_branch_but_no_pr_push() {
    let dir = init_repo();
    let path = dir.path().to_path_buf();

    let (value, metadata) = run_git_workflow(
        &path,
        ctx(true),
        1_700_000_000,
        "Remove dead code",
        "Automated cleanup",
        "Generated by a scheduled scan.",
        vec!["automated".to_string()],
        || async {
            std::fs::write(path.join("README.md"), "changed\n").unwrap();
            Ok::<_, GitError>(42)
        },
    )
    .await
    .unwrap();

    assert_eq!(value, 42);
    assert!(metadata.branch_name.is_some());
    assert!(metadata.commit_sha.is_some());
    assert_eq!(metadata.pr_url.as_deref(), Some(format!("dry-run-{}", metadata.branch_name.clone().unwrap()).as_str()));
    assert_eq!(BranchManager::current_branch(&path).await, "main");
}

#[tokio::test]
async fn workflow_propagates_handler_error_and_still_cleans_up() {
    let dir = init_repo();
    let path = dir.path().to_path_buf();

    let result = run_git_workflow(
        &path,
        ctx(true),
        1_700_000_001,
        "msg",
        "title",
        "body",
        vec![],
        || async { Err::<(), GitError>(GitError::HandlerFailed("boom".to_string())) },
    )
    .await;

    assert!(matches!(result, Err(GitError::HandlerFailed(_))));
    assert_eq!(BranchManager::current_branch(&path).await, "main");
}

#[tokio::test]
async fn workflow_with_no_changes_records_no_commit() {
    let dir = init_repo();
    let path = dir.path().to_path_buf();

    let (_, metadata) = run_git_workflow(
        &path,
        ctx(true),
        1_700_000_002,
        "msg",
        "title",
        "body",
        vec![],
        || async { Ok::<_, GitError>(()) },
    )
    .await
    .unwrap();

    assert!(metadata.commit_sha.is_none());
    assert!(metadata.pr_url.is_none());
}
