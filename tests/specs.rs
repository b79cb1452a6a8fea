// SPDX-License-Identifier: MIT

//! End-to-end scenario tests driving the Job Server against fakes for the
//! external collaborators (pattern detector) and real tempfile git repos
//! for anything that touches the working tree.

use async_trait::async_trait;
use scanforge_cache::ScanCache;
use scanforge_core::{FakeClock, Job, JobError, JobStatus};
use scanforge_report::{FakeReportGenerator, ReportCoordinator, ReportFormat};
use scanforge_scan::{DuplicateGroup, FakePatternDetector, ScanMetrics, ScanResult, ScanServiceConfig, ScanType};
use scanforge_server::{EventEmitter, Handler, JobServer, JobServerConfig, ScanHandler};
use scanforge_store::JobStore;
use std::collections::HashMap;
use std::process::Command as StdCommand;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn init_repo() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let run = |args: &[&str]| StdCommand::new("git").args(args).current_dir(dir.path()).output().expect("git invocation");
    run(&["init", "-q", "-b", "main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "Test"]);
    std::fs::write(dir.path().join("README.md"), "hello\n").expect("write");
    run(&["add", "-A"]);
    run(&["commit", "-q", "-m", "initial"]);
    dir
}

fn sample_result() -> ScanResult {
    ScanResult {
        scan_type: ScanType::IntraProject,
        metrics: ScanMetrics { total_duplicate_groups: 1, total_cross_repository_groups: 0, total_suggestions: 2 },
        duplicate_groups: vec![DuplicateGroup { id: "g1".to_string(), impact_score: 80, files: vec!["src/a.rs".to_string()] }],
        cross_repository_duplicates: vec![],
        cache_metadata: None,
    }
}

fn scan_server(detector: Arc<FakePatternDetector>, config: ScanServiceConfig) -> JobServer<FakeClock> {
    let cache = Arc::new(ScanCache::new(FakeClock::new()));
    let handler: Arc<dyn Handler> = Arc::new(ScanHandler::new(cache, detector, config, EventEmitter::new()));
    let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
    handlers.insert("scan".to_string(), handler);

    JobServer::new(JobServerConfig {
        clock: FakeClock::new(),
        max_concurrent: 2,
        store: Arc::new(JobStore::new()),
        handlers,
        default_handler: None,
        events: EventEmitter::new(),
    })
}

async fn wait_for_terminal(server: &JobServer<FakeClock>, id: &str) -> Job {
    for _ in 0..200 {
        let job = server.get_job(id).expect("job exists");
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} never reached a terminal status");
}

/// S1 — happy path: a scan job against a non-git directory completes with
/// the detector's result attached, uncached.
#[tokio::test]
async fn s1_happy_scan_completes_with_the_detector_result() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = Arc::new(FakePatternDetector::returning(sample_result()));
    let server = scan_server(detector, ScanServiceConfig::default());
    server.start();

    let job = server.create_job("job-s1", "scan", "pipe-a", serde_json::json!({
        "repository_path": dir.path().to_string_lossy(),
    }));

    let finished = wait_for_terminal(&server, &job.id).await;
    assert_eq!(finished.status, JobStatus::Completed);
    let result = finished.result.expect("result present");
    assert_eq!(result["metrics"]["total_duplicate_groups"], 1);
    assert!(result.get("cache_metadata").is_none());
    server.stop().await;
}

/// S2 — cache hit: scanning the same repository at the same commit twice
/// serves the second run from cache.
#[tokio::test]
async fn s2_second_scan_of_the_same_commit_is_a_cache_hit() {
    let repo = init_repo();
    let detector = Arc::new(FakePatternDetector::returning(sample_result()));
    let server = scan_server(detector, ScanServiceConfig::default());
    server.start();

    let first = server.create_job("job-s2a", "scan", "pipe-a", serde_json::json!({
        "repository_path": repo.path().to_string_lossy(),
    }));
    let first = wait_for_terminal(&server, &first.id).await;
    assert!(first.result.expect("result").get("cache_metadata").is_none());

    let second = server.create_job("job-s2b", "scan", "pipe-a", serde_json::json!({
        "repository_path": repo.path().to_string_lossy(),
    }));
    let second = wait_for_terminal(&server, &second.id).await;
    let cache_metadata = second.result.expect("result")["cache_metadata"].clone();
    assert_eq!(cache_metadata["from_cache"], true);
    server.stop().await;
}

/// S3 — dirty working tree: with uncommitted-change tracking on, a dirty
/// tree bypasses the cache on both read and write.
#[tokio::test]
async fn s3_dirty_working_tree_bypasses_the_cache() {
    let repo = init_repo();
    std::fs::write(repo.path().join("README.md"), "dirty\n").expect("write");

    let detector = Arc::new(FakePatternDetector::returning(sample_result()));
    let config = ScanServiceConfig { force_refresh: false, track_uncommitted: true };
    let server = scan_server(detector, config);
    server.start();

    let first = server.create_job("job-s3a", "scan", "pipe-a", serde_json::json!({
        "repository_path": repo.path().to_string_lossy(),
    }));
    let first = wait_for_terminal(&server, &first.id).await;
    assert!(first.result.clone().expect("result").get("cache_metadata").is_none());

    let second = server.create_job("job-s3b", "scan", "pipe-a", serde_json::json!({
        "repository_path": repo.path().to_string_lossy(),
    }));
    let second = wait_for_terminal(&server, &second.id).await;
    assert!(second.result.expect("result").get("cache_metadata").is_none());
    server.stop().await;
}

/// S4 — a non-retriable failure (missing `repository_path`) goes straight
/// to `failed` with no retry scheduled.
#[tokio::test]
async fn s4_non_retriable_failure_is_terminal_with_no_retry() {
    let detector = Arc::new(FakePatternDetector::returning(sample_result()));
    let server = scan_server(detector, ScanServiceConfig::default());
    server.start();

    let job = server.create_job("job-s4", "scan", "pipe-a", serde_json::json!({}));
    let finished = wait_for_terminal(&server, &job.id).await;

    assert_eq!(finished.status, JobStatus::Failed);
    assert_eq!(finished.error.expect("error").code.as_deref(), Some("programmer_error"));
    assert_eq!(server.get_stats().retry.active_retries, 0);
    server.stop().await;
}

/// S5 — cancelling a still-queued job (the drain loop never started) is
/// immediate and synchronous.
#[tokio::test]
async fn s5_cancel_of_a_queued_job_is_synchronous() {
    let detector = Arc::new(FakePatternDetector::returning(sample_result()));
    let server = scan_server(detector, ScanServiceConfig::default());
    // Deliberately not started: the job must still be `queued` to cancel.

    let job = server.create_job("job-s5", "scan", "pipe-a", serde_json::json!({
        "repository_path": "/tmp/does-not-matter",
    }));
    let cancelled = server.cancel_job(&job.id).expect("cancel succeeds");
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert!(cancelled.error.expect("error").cancelled);
}

struct FileWriterHandler;

#[async_trait]
impl Handler for FileWriterHandler {
    async fn handle(&self, job: &Job, _cancel: CancellationToken) -> Result<serde_json::Value, JobError> {
        let repo_path = job.data["repository_path"].as_str().expect("repository_path");
        std::fs::write(std::path::Path::new(repo_path).join("findings.md"), "duplicate found\n")
            .map_err(|e| JobError::with_code(e.to_string(), "transient_io"))?;
        Ok(serde_json::json!({ "wrote": "findings.md" }))
    }
}

/// S6 — a job with a `git` directive runs inside the Git Workflow Manager;
/// in dry-run mode the branch/commit happen but no push or PR is opened
/// for real (the dry-run PR url is a synthetic placeholder).
#[tokio::test]
async fn s6_git_workflow_commits_changes_under_dry_run() {
    let repo = init_repo();
    let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
    handlers.insert("consolidate".to_string(), Arc::new(FileWriterHandler));

    let server = JobServer::new(JobServerConfig {
        clock: FakeClock::new(),
        max_concurrent: 1,
        store: Arc::new(JobStore::new()),
        handlers,
        default_handler: None,
        events: EventEmitter::new(),
    });
    server.start();

    let job = server.create_job("job-s6", "consolidate", "pipe-a", serde_json::json!({
        "repository_path": repo.path().to_string_lossy(),
        "git": { "dry_run": true, "description": "consolidate duplicates" },
    }));

    let finished = wait_for_terminal(&server, &job.id).await;
    assert_eq!(finished.status, JobStatus::Completed);
    assert!(finished.git.branch_name.is_some());
    assert!(finished.git.commit_sha.is_some());
    assert!(finished.git.pr_url.expect("pr url").starts_with("dry-run-"));
    server.stop().await;
}

/// S7 — a completed scan's result is handed to the Report Coordinator,
/// which renders it through an external-style generator and writes the
/// artifact to disk under the configured reports directory.
#[tokio::test]
async fn s7_completed_scan_result_is_turned_into_a_report_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = Arc::new(FakePatternDetector::returning(sample_result()));
    let server = scan_server(detector, ScanServiceConfig::default());
    server.start();

    let job = server.create_job("job-s7", "scan", "pipe-a", serde_json::json!({
        "repository_path": dir.path().to_string_lossy(),
    }));
    let finished = wait_for_terminal(&server, &job.id).await;
    assert_eq!(finished.status, JobStatus::Completed);
    let scan: ScanResult = serde_json::from_value(finished.result.expect("result")).expect("scan result");

    let reports_dir = tempfile::tempdir().expect("tempdir");
    let generator = Arc::new(FakeReportGenerator::succeeding("# Duplicate report\n\n1 group found.\n"));
    let coordinator = ReportCoordinator::new(reports_dir.path(), generator, FakeClock::new());

    let artifact = coordinator.generate_report(&finished.id, &scan, ReportFormat::Markdown).await.expect("report generated");
    assert_eq!(artifact.format, ReportFormat::Markdown);
    let content = std::fs::read_to_string(&artifact.path).expect("artifact readable");
    assert!(content.contains("Duplicate report"));
    server.stop().await;
}
