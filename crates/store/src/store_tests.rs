// SPDX-License-Identifier: MIT

use super::*;
use scanforge_core::{Job, JobConfig, SystemClock};

fn job(id: &str, pipeline_id: &str, status: JobStatus) -> Job {
    Job::builder()
        .id(id)
        .pipeline_id(pipeline_id)
        .job_type("scan")
        .status(status)
        .build()
}

#[test]
fn save_job_is_upsert_by_id() {
    let store = JobStore::new();
    store.save_job(job("job-1", "pipe-a", JobStatus::Queued));
    store.save_job(job("job-1", "pipe-a", JobStatus::Running));
    assert_eq!(store.get_job("job-1").unwrap().status, JobStatus::Running);
    assert_eq!(store.get_all_jobs().len(), 1);
}

#[test]
fn get_jobs_filters_by_pipeline_and_status() {
    let store = JobStore::new();
    store.save_job(job("job-1", "pipe-a", JobStatus::Queued));
    store.save_job(job("job-2", "pipe-a", JobStatus::Running));
    store.save_job(job("job-3", "pipe-b", JobStatus::Queued));

    let queued = store.get_jobs("pipe-a", Some(JobStatus::Queued), 50, 0);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].id, "job-1");
}

#[test]
fn get_jobs_applies_pagination() {
    let store = JobStore::new();
    for i in 0..5 {
        store.save_job(job(&format!("job-{i}"), "pipe-a", JobStatus::Queued));
    }
    let page = store.get_jobs("pipe-a", None, 2, 2);
    assert_eq!(page.len(), 2);
}

#[test]
fn bulk_import_skips_existing_ids_and_reports_errors() {
    let store = JobStore::new();
    let config = JobConfig::builder("job-1").build();
    store.save_job(Job::new(config, &SystemClock));

    let records = vec![
        serde_json::json!({
            "id": "job-1",
            "job_type": "scan",
            "status": "queued",
            "created_at": "2026-01-01T00:00:00Z",
            "data": {},
        }),
        serde_json::json!({
            "id": "job-2",
            "job_type": "scan",
            "status": "queued",
            "created_at": "2026-01-01T00:00:00Z",
            "data": {},
        }),
        serde_json::json!({"job_type": "scan"}),
    ];

    let result = store.bulk_import_jobs(&records);
    assert_eq!(result.imported, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn bulk_import_of_empty_input_is_a_no_op() {
    let store = JobStore::new();
    let result = store.bulk_import_jobs(&[]);
    assert_eq!(result.imported, 0);
    assert_eq!(result.skipped, 0);
    assert!(result.errors.is_empty());
}
