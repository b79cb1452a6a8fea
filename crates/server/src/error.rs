// SPDX-License-Identifier: MIT

//! Structured failures returned from lifecycle operations. These are never
//! propagated as `Err` from the public API — `LifecycleOutcome` below is
//! the "result" type the Job Server actually returns to callers, matching
//! the `{success:false, message}` shape the distilled contract calls for.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("job not found: {0}")]
    NotFound(String),

    #[error("invalid transition: job {id} is {current}, cannot {attempted}")]
    InvalidTransition { id: String, current: String, attempted: String },
}

/// `{success:false, message}` on failure; `Ok(())` on success. Lifecycle
/// operations never panic and never mutate state on a rejected transition.
pub type LifecycleResult = Result<(), LifecycleError>;
