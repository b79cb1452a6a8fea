// SPDX-License-Identifier: MIT

//! In-memory job map and FIFO queue. This is the single logical writer the
//! scheduler and lifecycle mutations serialize through — every method takes
//! `&mut self` and the caller holds the lock for its duration.

use crate::error::LifecycleError;
use scanforge_core::{Clock, GitMetadata, Job, JobConfig, JobError, JobStatus};
use std::collections::{HashMap, VecDeque};

#[derive(Default)]
pub struct JobState {
    jobs: HashMap<String, Job>,
    queue: VecDeque<String>,
}

impl JobState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn all(&self) -> Vec<Job> {
        self.jobs.values().cloned().collect()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Create a job in `queued` status and enqueue it. Returns the stored
    /// job's snapshot.
    pub fn create(&mut self, config: JobConfig, clock: &impl Clock) -> Job {
        let job = Job::new(config, clock);
        self.queue.push_back(job.id.clone());
        self.jobs.insert(job.id.clone(), job.clone());
        job
    }

    /// Pop the next queued job id if `active_count < max_concurrent`.
    /// Transitions it to `running` and returns the updated snapshot.
    pub fn try_dequeue(&mut self, active_count: usize, max_concurrent: usize, clock: &impl Clock) -> Option<Job> {
        if active_count >= max_concurrent {
            return None;
        }
        let id = self.queue.pop_front()?;
        let job = self.jobs.get_mut(&id)?;
        job.status = JobStatus::Running;
        job.started_at = Some(clock.now());
        Some(job.clone())
    }

    /// No-op (returns `None`) if the job already left `running` — e.g. it
    /// was cancelled while its handler was still finishing up best-effort.
    pub fn complete(&mut self, id: &str, result: serde_json::Value, git: Option<GitMetadata>, clock: &impl Clock) -> Option<Job> {
        let job = self.jobs.get_mut(id)?;
        if job.status != JobStatus::Running {
            return None;
        }
        job.status = JobStatus::Completed;
        job.completed_at = Some(clock.now());
        job.result = Some(result);
        if let Some(git) = git {
            job.git = git;
        }
        Some(job.clone())
    }

    /// No-op (returns `None`) if the job already left `running` — see
    /// `complete` above.
    pub fn fail(&mut self, id: &str, error: JobError, git: Option<GitMetadata>, clock: &impl Clock) -> Option<Job> {
        let job = self.jobs.get_mut(id)?;
        if job.status != JobStatus::Running {
            return None;
        }
        job.status = JobStatus::Failed;
        job.completed_at = Some(clock.now());
        job.error = Some(error);
        if let Some(git) = git {
            job.git = git;
        }
        Some(job.clone())
    }

    /// Re-enqueue a job under a derived retry id, sharing the original's
    /// pipeline/type/data. The original record is left as-is (its terminal
    /// `failed` state stands; the retry is tracked as a fresh job).
    pub fn enqueue_retry(&mut self, retry_id: String, source: &Job, clock: &impl Clock) -> Job {
        let config = JobConfig::builder(retry_id)
            .pipeline_id(source.pipeline_id.clone())
            .job_type(source.job_type.clone())
            .data(source.data.clone())
            .build();
        self.create(config, clock)
    }

    pub fn cancel(&mut self, id: &str, clock: &impl Clock) -> Result<Job, LifecycleError> {
        let Some(job) = self.jobs.get(id) else {
            return Err(LifecycleError::NotFound(id.to_string()));
        };
        match job.status {
            JobStatus::Queued | JobStatus::Paused => {}
            other => {
                return Err(LifecycleError::InvalidTransition {
                    id: id.to_string(),
                    current: other.to_string(),
                    attempted: "cancel".to_string(),
                });
            }
        }
        self.queue.retain(|queued| queued != id);
        let job = self.jobs.get_mut(id).expect("checked above");
        job.status = JobStatus::Cancelled;
        job.completed_at = Some(clock.now());
        job.error = Some(JobError::cancelled_by_user());
        Ok(job.clone())
    }

    /// Best-effort cancellation of a `running` job: marks it terminal so the
    /// scheduler's bookkeeping is consistent, but actual interruption is up
    /// to the handler observing its cancellation token.
    pub fn cancel_running(&mut self, id: &str, clock: &impl Clock) -> Option<Job> {
        let job = self.jobs.get_mut(id)?;
        if job.status != JobStatus::Running {
            return None;
        }
        job.status = JobStatus::Cancelled;
        job.completed_at = Some(clock.now());
        job.error = Some(JobError::cancelled_by_user());
        Some(job.clone())
    }

    pub fn pause(&mut self, id: &str, clock: &impl Clock) -> Result<Job, LifecycleError> {
        let Some(job) = self.jobs.get(id) else {
            return Err(LifecycleError::NotFound(id.to_string()));
        };
        if job.status != JobStatus::Queued {
            return Err(LifecycleError::InvalidTransition {
                id: id.to_string(),
                current: job.status.to_string(),
                attempted: "pause".to_string(),
            });
        }
        self.queue.retain(|queued| queued != id);
        let job = self.jobs.get_mut(id).expect("checked above");
        job.status = JobStatus::Paused;
        job.paused_at = Some(clock.now());
        Ok(job.clone())
    }

    pub fn resume(&mut self, id: &str, clock: &impl Clock) -> Result<Job, LifecycleError> {
        let Some(job) = self.jobs.get(id) else {
            return Err(LifecycleError::NotFound(id.to_string()));
        };
        if job.status != JobStatus::Paused {
            return Err(LifecycleError::InvalidTransition {
                id: id.to_string(),
                current: job.status.to_string(),
                attempted: "resume".to_string(),
            });
        }
        let job = self.jobs.get_mut(id).expect("checked above");
        job.status = JobStatus::Queued;
        job.paused_at = None;
        job.resumed_at = Some(clock.now());
        self.queue.push_back(id.to_string());
        Ok(job.clone())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
