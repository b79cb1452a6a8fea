// SPDX-License-Identifier: MIT

use super::*;
use crate::handler::fake::FakeHandler;
use scanforge_core::FakeClock;
use std::time::Duration as StdDuration;

fn server_with(handler: Arc<dyn Handler>) -> JobServer<FakeClock> {
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

#[tokio::test]
async fn max_concurrent_of_zero_pauses_all_launches() {
    let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
    handlers.insert("scan".to_string(), Arc::new(FakeHandler::succeeding(serde_json::json!({"ok": true}))));
    let server = JobServer::new(JobServerConfig {
        clock: FakeClock::new(),
        max_concurrent: 0,
        store: Arc::new(JobStore::new()),
        handlers,
        default_handler: None,
        events: EventEmitter::new(),
    });
    server.start();
    let job = server.create_job("job-1", "scan", "pipe-a", serde_json::json!({}));

    tokio::time::sleep(StdDuration::from_millis(50)).await;
    assert_eq!(server.get_job(&job.id).unwrap().status, scanforge_core::JobStatus::Queued);
    server.stop().await;
}

#[tokio::test]
async fn a_created_job_runs_to_completion() {
    let server = server_with(Arc::new(FakeHandler::succeeding(serde_json::json!({"ok": true}))));
    server.start();
    let job = server.create_job("job-1", "scan", "pipe-a", serde_json::json!({}));

    for _ in 0..50 {
        if server.get_job(&job.id).unwrap().status.is_terminal() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    let completed = server.get_job(&job.id).unwrap();
    assert_eq!(completed.status, scanforge_core::JobStatus::Completed);
    server.stop().await;
}

#[tokio::test]
async fn a_non_retriable_failure_stays_failed_with_no_retry_scheduled() {
    let server = server_with(Arc::new(FakeHandler::failing(JobError::with_code("nope", "programmer_error"))));
    server.start();
    let job = server.create_job("job-1", "scan", "pipe-a", serde_json::json!({}));

    for _ in 0..50 {
        if server.get_job(&job.id).unwrap().status.is_terminal() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    assert_eq!(server.get_job(&job.id).unwrap().status, scanforge_core::JobStatus::Failed);
    assert_eq!(server.get_stats().retry.active_retries, 0);
    server.stop().await;
}

#[tokio::test]
async fn a_retriable_failure_schedules_a_derived_retry_job() {
    let server = server_with(Arc::new(FakeHandler::failing(JobError::with_code("timeout", "ETIMEDOUT"))));
    server.start();
    let job = server.create_job("job-1", "scan", "pipe-a", serde_json::json!({}));

    let mut retry_seen = false;
    for _ in 0..200 {
        if server.get_all_jobs().iter().any(|j| j.id == "job-1-retry1") {
            retry_seen = true;
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    assert!(retry_seen, "expected job-1-retry1 to be enqueued");
    assert_eq!(server.get_job(&job.id).unwrap().status, scanforge_core::JobStatus::Failed);
    server.stop().await;
}

#[tokio::test]
async fn cancel_of_a_queued_job_is_immediate_and_synchronous() {
    let server = server_with(Arc::new(FakeHandler::succeeding(serde_json::json!({}))));
    let job = server.create_job("job-1", "scan", "pipe-a", serde_json::json!({}));
    let cancelled = server.cancel_job(&job.id).unwrap();
    assert_eq!(cancelled.status, scanforge_core::JobStatus::Cancelled);
}

#[tokio::test]
async fn pause_then_resume_round_trips_a_queued_job() {
    let server = server_with(Arc::new(FakeHandler::succeeding(serde_json::json!({}))));
    let job = server.create_job("job-1", "scan", "pipe-a", serde_json::json!({}));
    let paused = server.pause_job(&job.id).unwrap();
    assert_eq!(paused.status, scanforge_core::JobStatus::Paused);
    let resumed = server.resume_job(&job.id).unwrap();
    assert_eq!(resumed.status, scanforge_core::JobStatus::Queued);
}

#[tokio::test]
async fn unregistered_job_type_fails_immediately_as_a_programmer_error() {
    let server = server_with(Arc::new(FakeHandler::succeeding(serde_json::json!({}))));
    server.start();
    let job = server.create_job("job-1", "unknown-type", "pipe-a", serde_json::json!({}));

    for _ in 0..50 {
        if server.get_job(&job.id).unwrap().status.is_terminal() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }

    let failed = server.get_job(&job.id).unwrap();
    assert_eq!(failed.status, scanforge_core::JobStatus::Failed);
    assert_eq!(failed.error.unwrap().code.as_deref(), Some("programmer_error"));
    server.stop().await;
}
