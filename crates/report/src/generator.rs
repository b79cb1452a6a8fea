// SPDX-License-Identifier: MIT

//! `ReportGenerator`: the opaque report-rendering collaborator. Its
//! internals (markdown/HTML templating) are out of scope here — the
//! coordinator only needs rendered bytes back for a given format.

use crate::error::ReportError;
use crate::format::ReportFormat;
use async_trait::async_trait;
use scanforge_scan::ScanResult;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

#[async_trait]
pub trait ReportGenerator: Send + Sync + 'static {
    async fn generate(&self, scan: &ScanResult, format: ReportFormat) -> Result<String, ReportError>;
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Shells out to an external renderer: scan result JSON on stdin, format
/// name as the sole argument, rendered report on stdout. Mirrors the
/// scanner's own out-of-process shim, since templating is equally out of
/// scope here.
pub struct ExternalReportGenerator {
    executable: PathBuf,
    timeout: Duration,
}

impl ExternalReportGenerator {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self { executable: executable.into(), timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ReportGenerator for ExternalReportGenerator {
    async fn generate(&self, scan: &ScanResult, format: ReportFormat) -> Result<String, ReportError> {
        use tokio::io::AsyncWriteExt;

        let input = serde_json::to_vec(scan).map_err(|e| ReportError::GeneratorFailed(e.to_string()))?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg(format.as_str());
        cmd.stdin(std::process::Stdio::piped());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| ReportError::GeneratorFailed(e.to_string()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input).await.map_err(|e| ReportError::GeneratorFailed(e.to_string()))?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ReportError::GeneratorFailed(format!("generator timed out after {:?}", self.timeout)))?
            .map_err(|e| ReportError::GeneratorFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(ReportError::GeneratorFailed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }

        String::from_utf8(output.stdout).map_err(|e| ReportError::GeneratorFailed(e.to_string()))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeReportGenerator {
        result: Arc<Mutex<Option<Result<String, String>>>>,
    }

    impl FakeReportGenerator {
        pub fn succeeding(content: impl Into<String>) -> Self {
            let generator = Self::default();
            *generator.result.lock() = Some(Ok(content.into()));
            generator
        }

        pub fn failing(message: impl Into<String>) -> Self {
            let generator = Self::default();
            *generator.result.lock() = Some(Err(message.into()));
            generator
        }
    }

    #[async_trait]
    impl ReportGenerator for FakeReportGenerator {
        async fn generate(&self, _scan: &ScanResult, _format: ReportFormat) -> Result<String, ReportError> {
            match self.result.lock().clone() {
                Some(Ok(content)) => Ok(content),
                Some(Err(message)) => Err(ReportError::GeneratorFailed(message)),
                None => Err(ReportError::GeneratorFailed("FakeReportGenerator has no configured result".to_string())),
            }
        }
    }
}
