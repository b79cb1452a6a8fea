// SPDX-License-Identifier: MIT

//! Retry bookkeeping: classifies a failure as retriable, advances or creates
//! the `RetryEntry` for a job's original id, and reports `retry_metrics()`.

use chrono::{DateTime, Utc};
use scanforge_core::{derived_retry_id, original_job_id, RetryDistribution, RetryEntry, RetryMetrics};
use std::collections::HashMap;
use std::time::Duration;

/// Error codes the default policy refuses to retry: missing files,
/// permission failures, and anything the handler marks as a programmer
/// error rather than a transient one.
const NON_RETRIABLE_CODES: &[&str] = &["ENOENT", "EACCES", "EPERM", "programmer_error", "git_operation"];

pub fn is_retriable(code: Option<&str>) -> bool {
    match code {
        Some(code) => !NON_RETRIABLE_CODES.contains(&code),
        None => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    ScheduleRetry { retry_id: String, attempt: u32, delay: Duration },
    Exhausted,
}

#[derive(Default)]
pub struct RetryPolicy {
    entries: HashMap<String, RetryEntry>,
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a retriable failure for `job_id` (which may itself already be
    /// a derived retry id) and decide whether another attempt remains.
    pub fn on_failure(&mut self, job_id: &str, now: DateTime<Utc>, delay: Duration) -> RetryOutcome {
        let original = original_job_id(job_id).to_string();

        let entry = self.entries.entry(original.clone()).or_insert_with(|| RetryEntry {
            attempts: 0,
            last_attempt: now,
            max_attempts: scanforge_core::retry::DEFAULT_MAX_ATTEMPTS,
            delay,
        });
        entry.attempts += 1;
        entry.last_attempt = now;
        entry.delay = delay;

        if entry.exhausted() {
            self.entries.remove(&original);
            return RetryOutcome::Exhausted;
        }

        let attempt = entry.attempts;
        RetryOutcome::ScheduleRetry { retry_id: derived_retry_id(&original, attempt), attempt, delay }
    }

    /// Drop retry bookkeeping once a job (identified by its original id)
    /// succeeds or is cancelled.
    pub fn clear(&mut self, job_id: &str) {
        self.entries.remove(original_job_id(job_id));
    }

    pub fn metrics(&self) -> RetryMetrics {
        let mut distribution = RetryDistribution::default();
        let mut total_attempts = 0u32;
        let mut jobs_being_retried = Vec::with_capacity(self.entries.len());

        for (job_id, entry) in &self.entries {
            jobs_being_retried.push(job_id.clone());
            total_attempts += entry.attempts;
            match entry.attempts {
                1 => distribution.attempt1 += 1,
                2 => distribution.attempt2 += 1,
                _ => distribution.attempt3_plus += 1,
            }
            if entry.nearing_limit() {
                distribution.nearing_limit += 1;
            }
        }

        RetryMetrics {
            active_retries: self.entries.len(),
            total_retry_attempts: total_attempts,
            jobs_being_retried,
            retry_distribution: distribution,
        }
    }
}

#[cfg(test)]
#[path = "retry_policy_tests.rs"]
mod tests;
