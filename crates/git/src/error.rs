// SPDX-License-Identifier: MIT

//! Errors surfaced from the Git Workflow Manager. Branch Manager and Commit
//! Tracker operations themselves never return `Err` for an invalid or
//! non-git path — they return conservative falsy values — so this enum
//! only covers the transactional workflow's own failure modes.

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("`{path}` is not a git repository")]
    NotARepository { path: String },

    #[error("base branch `{branch}` does not exist in `{path}`")]
    MissingBaseBranch { path: String, branch: String },

    #[error("failed to create job branch: {0}")]
    BranchCreation(String),

    #[error("failed to commit changes: {0}")]
    CommitFailed(String),

    #[error("handler failed: {0}")]
    HandlerFailed(String),
}
