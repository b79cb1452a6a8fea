// SPDX-License-Identifier: MIT

//! The Job Server: owns the in-memory job map/queue, drives the drain
//! loop, and is the single place that persists to `JobStore`, emits
//! events, and consults the retry policy.

use crate::error::LifecycleError;
use crate::event_emitter::EventEmitter;
use crate::handler::Handler;
use crate::retry_policy::{RetryOutcome, RetryPolicy};
use crate::scheduler::{run_job, JobOutcome};
use crate::stats::{self, JobStats};
use crate::state::JobState;
use parking_lot::Mutex;
use scanforge_core::{Clock, Event, Job, JobConfig, JobError, SystemClock};
use scanforge_store::JobStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Base delay for the first retry attempt; the policy itself tracks
/// attempt count per job so callers don't need to escalate it here.
const BASE_RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct JobServerConfig<C: Clock = SystemClock> {
    pub clock: C,
    pub max_concurrent: usize,
    pub store: Arc<JobStore>,
    /// Handlers keyed by `job_type`. A job whose type has no entry falls
    /// back to `default_handler`, and fails immediately if that's also unset.
    pub handlers: HashMap<String, Arc<dyn Handler>>,
    pub default_handler: Option<Arc<dyn Handler>>,
    /// Shared emitter so handlers constructed before the server (the scan
    /// handler's cache events, for instance) land on the same event bus.
    pub events: EventEmitter,
}

impl<C: Clock + Default> JobServerConfig<C> {
    pub fn new(store: Arc<JobStore>, max_concurrent: usize) -> Self {
        Self {
            clock: C::default(),
            max_concurrent,
            store,
            handlers: HashMap::new(),
            default_handler: None,
            events: EventEmitter::new(),
        }
    }
}

struct Inner<C: Clock> {
    state: Mutex<JobState>,
    retry: Mutex<RetryPolicy>,
    store: Arc<JobStore>,
    events: EventEmitter,
    handlers: HashMap<String, Arc<dyn Handler>>,
    default_handler: Option<Arc<dyn Handler>>,
    cancel_tokens: Mutex<HashMap<String, CancellationToken>>,
    clock: C,
    max_concurrent: usize,
    active_count: AtomicUsize,
    notify: Notify,
    shutdown: CancellationToken,
}

impl<C: Clock> Inner<C> {
    fn handler_for(&self, job_type: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(job_type).cloned().or_else(|| self.default_handler.clone())
    }

    fn emit(&self, event: Event) {
        self.events.emit(event);
    }
}

/// Owns the job queue/map and the drain loop that launches queued jobs
/// against their registered `Handler`. Cloning is cheap: every clone
/// shares the same underlying state.
pub struct JobServer<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
    drain_task: Mutex<Option<JoinHandle<()>>>,
}

impl<C: Clock> Clone for JobServer<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), drain_task: Mutex::new(None) }
    }
}

impl<C: Clock> JobServer<C> {
    pub fn new(config: JobServerConfig<C>) -> Self {
        let inner = Inner {
            state: Mutex::new(JobState::new()),
            retry: Mutex::new(RetryPolicy::new()),
            store: config.store,
            events: config.events,
            handlers: config.handlers,
            default_handler: config.default_handler,
            cancel_tokens: Mutex::new(HashMap::new()),
            clock: config.clock,
            max_concurrent: config.max_concurrent,
            active_count: AtomicUsize::new(0),
            notify: Notify::new(),
            shutdown: CancellationToken::new(),
        };
        Self { inner: Arc::new(inner), drain_task: Mutex::new(None) }
    }

    /// Spawn the drain loop. Idempotent: calling `start` while already
    /// running is a no-op.
    pub fn start(&self) {
        let mut task = self.drain_task.lock();
        if task.is_some() {
            return;
        }
        let inner = self.inner.clone();
        *task = Some(tokio::spawn(async move { drain_loop(inner).await }));
        info!("job server started");
    }

    /// Signal the drain loop to stop and wait for it to exit. Jobs already
    /// running continue to completion; only new launches are halted.
    pub async fn stop(&self) {
        self.inner.shutdown.cancel();
        let handle = self.drain_task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        info!("job server stopped");
    }

    pub fn create_job(&self, id: impl Into<String>, job_type: impl Into<String>, pipeline_id: impl Into<String>, data: serde_json::Value) -> Job {
        let config = JobConfig::builder(id).job_type(job_type).pipeline_id(pipeline_id).data(data).build();
        let job = self.inner.state.lock().create(config, &self.inner.clock);
        self.inner.store.save_job(job.clone());
        self.inner.emit(Event::JobCreated {
            id: job.id.clone(),
            pipeline_id: job.pipeline_id.clone(),
            job_type: job.job_type.clone(),
            created_at: job.created_at,
        });
        self.inner.notify.notify_one();
        job
    }

    pub fn get_job(&self, id: &str) -> Option<Job> {
        self.inner.state.lock().get(id).cloned()
    }

    pub fn get_all_jobs(&self) -> Vec<Job> {
        self.inner.state.lock().all()
    }

    pub fn get_stats(&self) -> JobStats {
        let jobs = self.inner.state.lock().all();
        let active = self.inner.active_count.load(Ordering::SeqCst);
        let retry = self.inner.retry.lock().metrics();
        stats::compute(&jobs, active, retry)
    }

    pub fn cancel_job(&self, id: &str) -> Result<Job, LifecycleError> {
        let job = {
            let mut state = self.inner.state.lock();
            match state.cancel(id, &self.inner.clock) {
                Ok(job) => job,
                Err(LifecycleError::InvalidTransition { .. }) => {
                    state.cancel_running(id, &self.inner.clock).ok_or_else(|| LifecycleError::NotFound(id.to_string()))?
                }
                Err(other) => return Err(other),
            }
        };

        // Cancellation of a running job is best-effort: its handler may keep
        // running for a while after this call returns. `active_count` stays
        // elevated and is decremented by `finish` once the handler actually
        // resolves, so we only signal the token here, not the bookkeeping.
        if let Some(token) = self.inner.cancel_tokens.lock().remove(id) {
            token.cancel();
        }
        self.inner.retry.lock().clear(id);
        self.inner.store.save_job(job.clone());
        self.inner.emit(Event::JobCancelled { id: job.id.clone(), completed_at: job.completed_at.unwrap_or_else(|| self.inner.clock.now()) });
        self.inner.notify.notify_one();
        Ok(job)
    }

    pub fn pause_job(&self, id: &str) -> Result<Job, LifecycleError> {
        let job = self.inner.state.lock().pause(id, &self.inner.clock)?;
        self.inner.store.save_job(job.clone());
        self.inner.emit(Event::JobPaused { id: job.id.clone(), paused_at: job.paused_at.unwrap_or_else(|| self.inner.clock.now()) });
        Ok(job)
    }

    pub fn resume_job(&self, id: &str) -> Result<Job, LifecycleError> {
        let job = self.inner.state.lock().resume(id, &self.inner.clock)?;
        self.inner.store.save_job(job.clone());
        self.inner.emit(Event::JobResumed { id: job.id.clone(), resumed_at: job.resumed_at.unwrap_or_else(|| self.inner.clock.now()) });
        self.inner.notify.notify_one();
        Ok(job)
    }

    /// Subscribe to every synchronously-dispatched event (registered
    /// listeners only see events emitted after they subscribe).
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Event) -> Result<(), String> + Send + Sync + 'static,
    {
        self.inner.events.subscribe(listener);
    }

    pub fn subscribe_activity(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.inner.events.subscribe_activity()
    }

    pub fn subscribe_jobs(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.inner.events.subscribe_jobs()
    }
}

async fn drain_loop<C: Clock>(inner: Arc<Inner<C>>) {
    loop {
        drain_once(&inner).await;
        tokio::select! {
            _ = inner.shutdown.cancelled() => return,
            _ = inner.notify.notified() => {}
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
    }
}

async fn drain_once<C: Clock>(inner: &Arc<Inner<C>>) {
    loop {
        let active = inner.active_count.load(Ordering::SeqCst);
        let job = {
            let mut state = inner.state.lock();
            state.try_dequeue(active, inner.max_concurrent, &inner.clock)
        };
        let Some(job) = job else { return };

        inner.active_count.fetch_add(1, Ordering::SeqCst);
        inner.store.save_job(job.clone());
        inner.emit(Event::JobStarted { id: job.id.clone(), started_at: job.started_at.unwrap_or_else(|| inner.clock.now()) });

        let token = CancellationToken::new();
        inner.cancel_tokens.lock().insert(job.id.clone(), token.clone());

        let Some(handler) = inner.handler_for(&job.job_type) else {
            finish(inner.clone(), job, JobOutcome {
                result: Err(JobError::with_code("no handler registered for job type", "programmer_error")),
                git: None,
            })
            .await;
            continue;
        };

        let inner_clone = inner.clone();
        tokio::spawn(async move {
            let outcome = run_job(job.clone(), handler, token, &inner_clone.clock, &inner_clone.events).await;
            finish(inner_clone, job, outcome).await;
        });
    }
}

async fn finish<C: Clock>(inner: Arc<Inner<C>>, job: Job, outcome: JobOutcome) {
    inner.cancel_tokens.lock().remove(&job.id);
    inner.active_count.fetch_sub(1, Ordering::SeqCst);

    match outcome.result {
        Ok(result) => {
            let updated = {
                let mut state = inner.state.lock();
                state.complete(&job.id, result.clone(), outcome.git, &inner.clock)
            };
            if let Some(updated) = updated {
                inner.retry.lock().clear(&job.id);
                inner.store.save_job(updated.clone());
                inner.emit(Event::JobCompleted {
                    id: updated.id.clone(),
                    completed_at: updated.completed_at.unwrap_or_else(|| inner.clock.now()),
                    result: Some(result),
                });
            }
        }
        Err(error) => {
            let updated = {
                let mut state = inner.state.lock();
                state.fail(&job.id, error.clone(), outcome.git, &inner.clock)
            };
            let Some(updated) = updated else { return };
            inner.store.save_job(updated.clone());
            inner.emit(Event::JobFailed {
                id: updated.id.clone(),
                completed_at: updated.completed_at.unwrap_or_else(|| inner.clock.now()),
                error: error.clone(),
            });

            if error.cancelled || !crate::retry_policy::is_retriable(error.code.as_deref()) {
                return;
            }

            let outcome = inner.retry.lock().on_failure(&job.id, inner.clock.now(), BASE_RETRY_DELAY);
            match outcome {
                RetryOutcome::ScheduleRetry { retry_id, attempt, delay } => {
                    schedule_retry(inner, updated, retry_id, attempt, delay);
                }
                RetryOutcome::Exhausted => {
                    warn!(job_id = job.id.as_str(), "retry attempts exhausted");
                }
            }
        }
    }
}

fn schedule_retry<C: Clock>(inner: Arc<Inner<C>>, source: Job, retry_id: String, attempt: u32, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let job = {
            let mut state = inner.state.lock();
            state.enqueue_retry(retry_id.clone(), &source, &inner.clock)
        };
        inner.store.save_job(job.clone());
        inner.emit(Event::JobRetryScheduled { id: source.id.clone(), retry_id, attempt });
        inner.notify.notify_one();
    });
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
