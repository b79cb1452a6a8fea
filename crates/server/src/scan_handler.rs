// SPDX-License-Identifier: MIT

//! The specialized scan worker: parses a job's `data` into a scan request,
//! consults the repository's git status, and runs the cache-vs-compute
//! scan. This is the concrete `Handler` the scheduler drives for
//! `job_type == "scan"` jobs.

use crate::event_emitter::EventEmitter;
use crate::handler::Handler;
use async_trait::async_trait;
use scanforge_core::{Clock, Job, JobError};
use scanforge_git::CommitTracker;
use scanforge_scan::{scan, HandlerError, PatternDetector, ScanOptions, ScanRequest, ScanServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Maps a `HandlerError` to the job-error code the retry policy classifies
/// by. `SpawnFailed`/`Timeout` are transient infrastructure failures;
/// everything else indicates the input or the scanner's output itself is
/// the problem and retrying verbatim would not help.
fn job_error_for(err: HandlerError) -> JobError {
    let code = match &err {
        HandlerError::SpawnFailed(_) | HandlerError::Timeout(_) => "transient_io",
        HandlerError::NonZeroExit { .. } | HandlerError::MalformedOutput(_) => "programmer_error",
        HandlerError::GitWorkflow(_) => "git_operation",
    };
    JobError::with_code(err.to_string(), code)
}

fn parse_request(data: &serde_json::Value) -> Result<ScanRequest, JobError> {
    let repository_path = data
        .get("repository_path")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| JobError::with_code("job data missing repository_path", "programmer_error"))?;

    let options = data
        .get("options")
        .map(|v| serde_json::from_value::<ScanOptions>(v.clone()))
        .transpose()
        .map_err(|e| JobError::with_code(format!("invalid scan options: {e}"), "programmer_error"))?
        .unwrap_or_default();

    Ok(ScanRequest { repository_path: PathBuf::from(repository_path), options })
}

pub struct ScanHandler<C: Clock> {
    cache: Arc<scanforge_cache::ScanCache<C>>,
    detector: Arc<dyn PatternDetector>,
    config: ScanServiceConfig,
    events: EventEmitter,
}

impl<C: Clock> ScanHandler<C> {
    pub fn new(
        cache: Arc<scanforge_cache::ScanCache<C>>,
        detector: Arc<dyn PatternDetector>,
        config: ScanServiceConfig,
        events: EventEmitter,
    ) -> Self {
        Self { cache, detector, config, events }
    }
}

#[async_trait]
impl<C: Clock> Handler for ScanHandler<C> {
    async fn handle(&self, job: &Job, _cancel: CancellationToken) -> Result<serde_json::Value, JobError> {
        let request = parse_request(&job.data)?;
        let repo_path = request.repository_path.to_string_lossy().to_string();
        let repo_status = CommitTracker::repository_status(&request.repository_path).await;

        let on_event = |event| self.events.emit(event);
        let result = scan(&repo_path, &repo_status, &request, &self.config, &self.cache, self.detector.as_ref(), Some(&on_event))
            .await
            .map_err(job_error_for)?;

        serde_json::to_value(&result).map_err(|e| JobError::with_code(e.to_string(), "programmer_error"))
    }
}

#[cfg(test)]
#[path = "scan_handler_tests.rs"]
mod tests;
