// SPDX-License-Identifier: MIT

//! Event dispatch helpers — name, job id extraction, log summary.

use super::Event;

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::JobCreated { .. } => "job:created",
            Event::JobStarted { .. } => "job:started",
            Event::JobCompleted { .. } => "job:completed",
            Event::JobFailed { .. } => "job:failed",
            Event::JobPaused { .. } => "job:paused",
            Event::JobResumed { .. } => "job:resumed",
            Event::JobCancelled { .. } => "job:cancelled",
            Event::JobRetryScheduled { .. } => "job:retry_scheduled",
            Event::CacheHit { .. } => "cache:hit",
            Event::CacheMiss { .. } => "cache:miss",
            Event::GitWorkflowStarted { .. } => "git:workflow_started",
            Event::GitWorkflowCompleted { .. } => "git:workflow_completed",
            Event::Custom => "custom",
        }
    }

    /// Extract the job id this event pertains to, if any.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Event::JobCreated { id, .. }
            | Event::JobStarted { id, .. }
            | Event::JobCompleted { id, .. }
            | Event::JobFailed { id, .. }
            | Event::JobPaused { id, .. }
            | Event::JobResumed { id, .. }
            | Event::JobCancelled { id, .. }
            | Event::JobRetryScheduled { id, .. } => Some(id),
            Event::GitWorkflowStarted { job_id, .. } | Event::GitWorkflowCompleted { job_id, .. } => {
                Some(job_id)
            }
            _ => None,
        }
    }

    /// One-line human summary for structured logging.
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::JobCreated { id, job_type, .. } => format!("{t} id={id} type={job_type}"),
            Event::JobStarted { id, .. } => format!("{t} id={id}"),
            Event::JobCompleted { id, .. } => format!("{t} id={id}"),
            Event::JobFailed { id, error, .. } => format!("{t} id={id} error={}", error.message),
            Event::JobPaused { id, .. } => format!("{t} id={id}"),
            Event::JobResumed { id, .. } => format!("{t} id={id}"),
            Event::JobCancelled { id, .. } => format!("{t} id={id}"),
            Event::JobRetryScheduled { id, retry_id, attempt } => {
                format!("{t} id={id} retry_id={retry_id} attempt={attempt}")
            }
            Event::CacheHit { repository_path, short_commit } => {
                format!("{t} repo={repository_path} commit={short_commit}")
            }
            Event::CacheMiss { repository_path, short_commit } => {
                format!("{t} repo={repository_path} commit={short_commit}")
            }
            Event::GitWorkflowStarted { job_id, branch_name } => {
                format!("{t} job_id={job_id} branch={branch_name}")
            }
            Event::GitWorkflowCompleted { job_id, pr_url } => {
                format!("{t} job_id={job_id} pr_url={}", pr_url.as_deref().unwrap_or("-"))
            }
            Event::Custom => t.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
