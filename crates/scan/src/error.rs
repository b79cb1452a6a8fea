// SPDX-License-Identifier: MIT

//! Errors surfaced from a job handler. The retry policy in
//! `scanforge-server` classifies these to decide whether a failed job is
//! eligible for another attempt.

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("scanner exited with status {exit_code}: {stderr}")]
    NonZeroExit { exit_code: i32, stderr: String },

    #[error("scanner produced malformed JSON: {0}")]
    MalformedOutput(String),

    #[error("failed to spawn scanner: {0}")]
    SpawnFailed(String),

    #[error("scanner timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("git workflow failed: {0}")]
    GitWorkflow(#[from] scanforge_git::GitError),
}

impl HandlerError {
    /// Whether a retry of the same job is worth attempting. Spawn/timeout
    /// failures are almost always transient; malformed output and non-zero
    /// exits usually indicate the input itself is the problem.
    pub fn is_retriable(&self) -> bool {
        matches!(self, HandlerError::SpawnFailed(_) | HandlerError::Timeout(_))
    }
}
