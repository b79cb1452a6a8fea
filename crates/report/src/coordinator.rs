// SPDX-License-Identifier: MIT

//! Report Coordinator: invokes a `ReportGenerator` for a completed scan and
//! writes the rendered content under a configured reports directory,
//! naming the artifact by job id and timestamp. A caller driving this from
//! job completion should log and move on when this returns `Err` — a
//! report failure is a side effect going wrong, not the scan itself.

use crate::error::ReportError;
use crate::format::ReportFormat;
use crate::generator::ReportGenerator;
use scanforge_core::{Clock, SystemClock};
use scanforge_scan::ScanResult;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub format: ReportFormat,
}

pub struct ReportCoordinator<C: Clock = SystemClock> {
    reports_dir: PathBuf,
    generator: Arc<dyn ReportGenerator>,
    clock: C,
}

impl<C: Clock> ReportCoordinator<C> {
    pub fn new(reports_dir: impl Into<PathBuf>, generator: Arc<dyn ReportGenerator>, clock: C) -> Self {
        Self { reports_dir: reports_dir.into(), generator, clock }
    }

    pub async fn generate_report(&self, job_id: &str, scan: &ScanResult, format: ReportFormat) -> Result<ReportArtifact, ReportError> {
        let content = self.generator.generate(scan, format).await.inspect_err(|e| {
            warn!(job_id, error = %e, "report generator failed");
        })?;

        tokio::fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|source| ReportError::Write { path: self.reports_dir.display().to_string(), source })?;

        let filename = format!("{job_id}-{}.{}", self.clock.epoch_ms(), format.extension());
        let path = self.reports_dir.join(filename);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| ReportError::Write { path: path.display().to_string(), source })?;

        Ok(ReportArtifact { path, format })
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
