// SPDX-License-Identifier: MIT

//! Job identifier, status, and the durable record shape.

use crate::clock::Clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// Unique identifier for a job instance.
    ///
    /// Job ids are externally supplied (see `scanforge-validate`) rather than
    /// generated, but they share the `IdBuf` representation so they compare
    /// and hash the same way as every other id in the system.
    pub struct JobId("job-");
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Paused,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled)
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Paused => "paused",
        Cancelled => "cancelled",
    }
}

/// Structured failure recorded on a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None, cancelled: false }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self { message: message.into(), code: Some(code.into()), cancelled: false }
    }

    pub fn cancelled_by_user() -> Self {
        Self { message: "cancelled by user".to_string(), code: None, cancelled: true }
    }
}

/// git metadata populated by the Git Workflow Manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_files: Vec<String>,
}

/// Configuration for creating a new job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub id: String,
    pub pipeline_id: String,
    pub job_type: String,
    pub data: serde_json::Value,
}

impl JobConfig {
    pub fn builder(id: impl Into<String>) -> JobConfigBuilder {
        JobConfigBuilder {
            id: id.into(),
            pipeline_id: "unknown".to_string(),
            job_type: "job".to_string(),
            data: serde_json::Value::Null,
        }
    }
}

pub struct JobConfigBuilder {
    id: String,
    pipeline_id: String,
    job_type: String,
    data: serde_json::Value,
}

impl JobConfigBuilder {
    crate::setters! {
        into {
            pipeline_id: String,
            job_type: String,
        }
        set {
            data: serde_json::Value,
        }
    }

    pub fn build(self) -> JobConfig {
        JobConfig {
            id: self.id,
            pipeline_id: self.pipeline_id,
            job_type: self.job_type,
            data: self.data,
        }
    }
}

/// A job instance. The Job Server owns the only mutable copy; every other
/// component receives a cloned snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub pipeline_id: String,
    pub job_type: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumed_at: Option<DateTime<Utc>>,
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    #[serde(default)]
    pub git: GitMetadata,
}

impl Job {
    /// Create a new job in `queued` status.
    pub fn new(config: JobConfig, clock: &impl Clock) -> Self {
        Self {
            id: config.id,
            pipeline_id: config.pipeline_id,
            job_type: config.job_type,
            status: JobStatus::Queued,
            created_at: clock.now(),
            started_at: None,
            completed_at: None,
            paused_at: None,
            resumed_at: None,
            data: config.data,
            result: None,
            error: None,
            git: GitMetadata::default(),
        }
    }

    /// Map of snake_case/camelCase aliases to the canonical field, used by
    /// bulk import (see `scanforge-store`). Kept here so the canonical field
    /// names live in exactly one place.
    pub fn canonical_field(name: &str) -> Option<&'static str> {
        Some(match name {
            "id" => "id",
            "pipeline_id" | "pipelineId" => "pipeline_id",
            "job_type" | "jobType" => "job_type",
            "status" => "status",
            "created_at" | "createdAt" => "created_at",
            "started_at" | "startedAt" => "started_at",
            "completed_at" | "completedAt" => "completed_at",
            "paused_at" | "pausedAt" => "paused_at",
            "resumed_at" | "resumedAt" => "resumed_at",
            "data" => "data",
            "result" => "result",
            "error" => "error",
            "git" => "git",
            _ => return None,
        })
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            id: String = "job-test1",
            pipeline_id: String = "unknown",
            job_type: String = "job",
        }
        set {
            status: JobStatus = JobStatus::Queued,
            data: serde_json::Value = serde_json::Value::Null,
            git: GitMetadata = GitMetadata::default(),
        }
        option {
            started_at: DateTime<Utc> = None,
            completed_at: DateTime<Utc> = None,
            paused_at: DateTime<Utc> = None,
            resumed_at: DateTime<Utc> = None,
            result: serde_json::Value = None,
            error: JobError = None,
        }
        computed {
            created_at: DateTime<Utc> = Utc::now(),
        }
    }
}

/// Parameters accepted for the job-list query.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub status: Option<JobStatus>,
    pub limit: usize,
    pub offset: usize,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
