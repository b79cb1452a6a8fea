// SPDX-License-Identifier: MIT

//! Event types emitted by the Job Server's typed event bus.

mod dispatch;

use crate::job::{JobError, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events that mirror job lifecycle transitions and ancillary subsystem
/// activity onto the broadcast channels (`activity`, `jobs`).
///
/// Serializes with `{"type": "event:name", ...fields}` format. Unknown type
/// tags deserialize to `Custom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "job:created")]
    JobCreated {
        id: String,
        pipeline_id: String,
        job_type: String,
        created_at: DateTime<Utc>,
    },

    #[serde(rename = "job:started")]
    JobStarted { id: String, started_at: DateTime<Utc> },

    #[serde(rename = "job:completed")]
    JobCompleted {
        id: String,
        completed_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
    },

    #[serde(rename = "job:failed")]
    JobFailed { id: String, completed_at: DateTime<Utc>, error: JobError },

    #[serde(rename = "job:paused")]
    JobPaused { id: String, paused_at: DateTime<Utc> },

    #[serde(rename = "job:resumed")]
    JobResumed { id: String, resumed_at: DateTime<Utc> },

    #[serde(rename = "job:cancelled")]
    JobCancelled { id: String, completed_at: DateTime<Utc> },

    #[serde(rename = "job:retry_scheduled")]
    JobRetryScheduled { id: String, retry_id: String, attempt: u32 },

    #[serde(rename = "cache:hit")]
    CacheHit { repository_path: String, short_commit: String },

    #[serde(rename = "cache:miss")]
    CacheMiss { repository_path: String, short_commit: String },

    #[serde(rename = "git:workflow_started")]
    GitWorkflowStarted { job_id: String, branch_name: String },

    #[serde(rename = "git:workflow_completed")]
    GitWorkflowCompleted {
        job_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pr_url: Option<String>,
    },

    /// Catch-all for unknown event types (extensibility).
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    pub fn status_for(status: JobStatus) -> &'static str {
        match status {
            JobStatus::Queued => "job:created",
            JobStatus::Running => "job:started",
            JobStatus::Completed => "job:completed",
            JobStatus::Failed => "job:failed",
            JobStatus::Paused => "job:paused",
            JobStatus::Cancelled => "job:cancelled",
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
