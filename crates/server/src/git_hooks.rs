// SPDX-License-Identifier: MIT

//! Commit-message and PR-context generation for a job wrapped in the Git
//! Workflow Manager. Pure functions of the job snapshot — no I/O.

use scanforge_core::{GitMetadata, Job};

pub struct CommitMessage {
    pub title: String,
    pub body: String,
}

/// `{title, body}` including job_type, job_id, and the changed-file count.
pub fn generate_commit_message(job: &Job, changed_file_count: usize) -> CommitMessage {
    CommitMessage {
        title: format!("scanforge: {} results for {}", job.job_type, job.id),
        body: format!(
            "Job type: {}\nJob ID: {}\nFiles changed: {}",
            job.job_type, job.id, changed_file_count
        ),
    }
}

pub struct PrContext {
    pub branch_name: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// `{branch_name, title, body, labels}` including the changed-file list.
pub fn generate_pr_context(job: &Job, git: &GitMetadata) -> PrContext {
    let branch_name = git.branch_name.clone().unwrap_or_default();
    let files_list = if git.changed_files.is_empty() {
        "(no files changed)".to_string()
    } else {
        git.changed_files.iter().map(|f| format!("- {f}")).collect::<Vec<_>>().join("\n")
    };

    PrContext {
        branch_name,
        title: format!("scanforge: {} results for {}", job.job_type, job.id),
        body: format!("Originating job: {}\n\nFiles changed:\n{}", job.id, files_list),
        labels: vec!["automated".to_string(), format!("scanforge-{}", job.job_type)],
    }
}

#[cfg(test)]
#[path = "git_hooks_tests.rs"]
mod tests;
