// SPDX-License-Identifier: MIT

//! Context value objects passed into Branch Manager operations.

use serde::{Deserialize, Serialize};

/// Identifies the job whose work a branch/commit/PR belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobBranchContext {
    pub job_id: String,
    pub job_type: Option<String>,
    pub description: Option<String>,
    pub base_branch: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitContext {
    pub job_id: String,
    pub message: String,
    pub description: Option<String>,
    pub changed_file_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrContext {
    pub branch_name: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// `{branch_name, original_branch}` returned by `create_job_branch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobBranch {
    pub branch_name: String,
    pub original_branch: String,
}
