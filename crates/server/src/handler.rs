// SPDX-License-Identifier: MIT

//! The handler boundary a job's business logic implements. The scheduler
//! calls `handle` on a spawned task; the handler observes `cancel` at its
//! own suspension points (subprocess calls, cache I/O) since cancellation
//! of a running job is best-effort.

use async_trait::async_trait;
use scanforge_core::{Job, JobError};
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, job: &Job, cancel: CancellationToken) -> Result<serde_json::Value, JobError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeHandler {
        result: Arc<Mutex<Option<Result<serde_json::Value, JobError>>>>,
    }

    impl FakeHandler {
        pub fn succeeding(value: serde_json::Value) -> Self {
            let handler = Self::default();
            *handler.result.lock() = Some(Ok(value));
            handler
        }

        pub fn failing(error: JobError) -> Self {
            let handler = Self::default();
            *handler.result.lock() = Some(Err(error));
            handler
        }
    }

    #[async_trait]
    impl Handler for FakeHandler {
        async fn handle(&self, _job: &Job, _cancel: CancellationToken) -> Result<serde_json::Value, JobError> {
            match self.result.lock().clone() {
                Some(result) => result,
                None => Ok(serde_json::Value::Null),
            }
        }
    }
}
