// SPDX-License-Identifier: MIT

//! `get_stats()` read surface.

use scanforge_core::{Job, JobStatus, RetryMetrics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStats {
    pub total: usize,
    pub queued: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub paused: usize,
    pub cancelled: usize,
    pub active_count: usize,
    pub retry: RetryMetrics,
}

pub fn compute(jobs: &[Job], active_count: usize, retry: RetryMetrics) -> JobStats {
    let mut stats = JobStats { active_count, retry, ..Default::default() };
    stats.total = jobs.len();
    for job in jobs {
        match job.status {
            JobStatus::Queued => stats.queued += 1,
            JobStatus::Running => stats.running += 1,
            JobStatus::Completed => stats.completed += 1,
            JobStatus::Failed => stats.failed += 1,
            JobStatus::Paused => stats.paused += 1,
            JobStatus::Cancelled => stats.cancelled += 1,
        }
    }
    stats
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
