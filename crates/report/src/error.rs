// SPDX-License-Identifier: MIT

//! Failures surfaced from the Report Coordinator. Never fed back into the
//! job lifecycle — a caller driving this from a completed scan job treats
//! any `Err` here as a warning, not a reason to mark the job `failed`.

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report generator failed: {0}")]
    GeneratorFailed(String),

    #[error("failed to write report artifact to {path}: {source}")]
    Write { path: String, source: std::io::Error },
}
