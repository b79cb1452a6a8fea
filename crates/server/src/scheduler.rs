// SPDX-License-Identifier: MIT

//! Runs a single job's handler, optionally wrapped in the Git Workflow
//! Manager transaction when the job's `data` carries a `git` directive.
//! Kept free of the job map/queue so it can be unit-tested without a
//! running scheduler loop.

use crate::event_emitter::EventEmitter;
use crate::git_hooks::{generate_commit_message, generate_pr_context};
use crate::handler::Handler;
use parking_lot::Mutex;
use scanforge_core::{Clock, Event, GitMetadata, Job, JobError};
use scanforge_git::{derive_branch_name, run_git_workflow, GitError, JobBranchContext};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of running one job to completion: the handler's outcome, plus
/// git metadata when the job went through the workflow transaction.
pub struct JobOutcome {
    pub result: Result<Value, JobError>,
    pub git: Option<GitMetadata>,
}

pub async fn run_job<C: Clock>(
    job: Job,
    handler: Arc<dyn Handler>,
    cancel: CancellationToken,
    clock: &C,
    events: &EventEmitter,
) -> JobOutcome {
    let Some(git_opts) = job.data.get("git").and_then(Value::as_object).cloned() else {
        return JobOutcome { result: handler.handle(&job, cancel).await, git: None };
    };

    let Some(repository_path) = job.data.get("repository_path").and_then(Value::as_str).map(PathBuf::from) else {
        return JobOutcome {
            result: Err(JobError::with_code("git workflow requested without repository_path", "programmer_error")),
            git: None,
        };
    };

    let ctx = JobBranchContext {
        job_id: job.id.clone(),
        job_type: Some(job.job_type.clone()),
        description: git_opts.get("description").and_then(Value::as_str).map(str::to_string),
        base_branch: git_opts.get("base_branch").and_then(Value::as_str).map(str::to_string),
        dry_run: git_opts.get("dry_run").and_then(Value::as_bool).unwrap_or(false),
    };

    let commit_message = generate_commit_message(&job, 0);
    let pr = generate_pr_context(&job, &GitMetadata::default());
    let epoch_ms = clock.epoch_ms();
    let branch_name = derive_branch_name(ctx.job_type.as_deref(), ctx.description.as_deref(), epoch_ms);

    events.emit(Event::GitWorkflowStarted { job_id: job.id.clone(), branch_name });

    let stashed_error: Arc<Mutex<Option<JobError>>> = Arc::new(Mutex::new(None));
    let stash = stashed_error.clone();
    let handler_job = job.clone();

    let outcome = run_git_workflow(
        &repository_path,
        ctx,
        epoch_ms,
        commit_message.title.clone(),
        pr.title.clone(),
        pr.body.clone(),
        pr.labels.clone(),
        move || async move {
            match handler.handle(&handler_job, cancel).await {
                Ok(value) => Ok(value),
                Err(err) => {
                    *stash.lock() = Some(err.clone());
                    Err(GitError::HandlerFailed(err.message.clone()))
                }
            }
        },
    )
    .await;

    let result = match outcome {
        Ok((value, metadata)) => {
            events.emit(Event::GitWorkflowCompleted { job_id: job.id.clone(), pr_url: metadata.pr_url.clone() });
            JobOutcome { result: Ok(value), git: Some(metadata) }
        }
        Err(GitError::HandlerFailed(message)) => {
            events.emit(Event::GitWorkflowCompleted { job_id: job.id.clone(), pr_url: None });
            let err = stashed_error.lock().clone().unwrap_or_else(|| JobError::new(message));
            JobOutcome { result: Err(err), git: None }
        }
        Err(other) => {
            events.emit(Event::GitWorkflowCompleted { job_id: job.id.clone(), pr_url: None });
            JobOutcome { result: Err(JobError::with_code(other.to_string(), "git_operation")), git: None }
        }
    };

    result
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
