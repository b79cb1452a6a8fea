// SPDX-License-Identifier: MIT

//! `JobStore`: durable-shaped job persistence, independent of the Job
//! Server's in-memory queue. Backed by a concurrent map here; a real
//! deployment can swap the map for a table-backed implementation without
//! changing this surface.

use crate::bulk_import::{parse_record, BulkImportResult};
use crate::pagination;
use parking_lot::RwLock;
use scanforge_core::{Job, JobStatus};
use std::collections::HashMap;

#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert by id.
    pub fn save_job(&self, job: Job) {
        self.jobs.write().insert(job.id.clone(), job);
    }

    pub fn get_job(&self, id: &str) -> Option<Job> {
        self.jobs.read().get(id).cloned()
    }

    pub fn get_all_jobs(&self) -> Vec<Job> {
        self.jobs.read().values().cloned().collect()
    }

    /// List jobs for a pipeline, optionally filtered by status, with
    /// sanitized pagination applied after a stable sort by `created_at`.
    pub fn get_jobs(
        &self,
        pipeline_id: &str,
        status: Option<JobStatus>,
        limit: usize,
        offset: usize,
    ) -> Vec<Job> {
        let (limit, offset) = pagination::sanitize(limit, offset);
        let jobs = self.jobs.read();
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|j| j.pipeline_id == pipeline_id)
            .filter(|j| status.map_or(true, |s| j.status == s))
            .cloned()
            .collect();
        matching.sort_by_key(|j| j.created_at);
        matching.into_iter().skip(offset).take(limit).collect()
    }

    /// Import raw JSON records, skipping ids that already exist. Per-record
    /// failures are collected rather than aborting the batch.
    pub fn bulk_import_jobs(&self, records: &[serde_json::Value]) -> BulkImportResult {
        let mut result = BulkImportResult::default();
        if records.is_empty() {
            return result;
        }

        let mut jobs = self.jobs.write();
        for record in records {
            match parse_record(record) {
                Ok(job) => {
                    if jobs.contains_key(&job.id) {
                        result.skipped += 1;
                        continue;
                    }
                    jobs.insert(job.id.clone(), job);
                    result.imported += 1;
                }
                Err(err) => {
                    result.errors.push(err.to_string());
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
