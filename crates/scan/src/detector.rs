// SPDX-License-Identifier: MIT

//! `PatternDetector`: the opaque duplicate-detection algorithm, invoked as
//! a sub-process. `ExternalScannerShim` is the concrete adapter; tests use
//! `FakePatternDetector` instead of shelling out.

use crate::error::HandlerError;
use crate::result::ScanResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOptions {
    #[serde(default)]
    pub force_refresh: bool,
    #[serde(default)]
    pub include_tests: bool,
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

fn default_cache_enabled() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub repository_path: PathBuf,
    pub options: ScanOptions,
}

#[async_trait]
pub trait PatternDetector: Send + Sync + 'static {
    async fn detect(&self, request: &ScanRequest) -> Result<ScanResult, HandlerError>;
}

/// Spawns a configured executable with the repository path and options as
/// arguments, parses its stdout as the JSON result envelope.
pub struct ExternalScannerShim {
    executable: PathBuf,
    timeout: Duration,
}

impl ExternalScannerShim {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PatternDetector for ExternalScannerShim {
    async fn detect(&self, request: &ScanRequest) -> Result<ScanResult, HandlerError> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(&request.repository_path);
        if request.options.include_tests {
            cmd.arg("--include-tests");
        }
        if let Some(max_depth) = request.options.max_depth {
            cmd.arg("--max-depth").arg(max_depth.to_string());
        }

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(HandlerError::SpawnFailed(e.to_string())),
            Err(_) => return Err(HandlerError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(HandlerError::NonZeroExit {
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| HandlerError::MalformedOutput(e.to_string()))
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{HandlerError, PatternDetector, ScanRequest, ScanResult};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakePatternDetector {
        result: Arc<Mutex<Option<Result<ScanResult, String>>>>,
    }

    impl FakePatternDetector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn returning(result: ScanResult) -> Self {
            let detector = Self::new();
            detector.set_result(Ok(result));
            detector
        }

        pub fn set_result(&self, result: Result<ScanResult, String>) {
            *self.result.lock() = Some(result);
        }
    }

    #[async_trait]
    impl PatternDetector for FakePatternDetector {
        async fn detect(&self, _request: &ScanRequest) -> Result<ScanResult, HandlerError> {
            match self.result.lock().clone() {
                Some(Ok(result)) => Ok(result),
                Some(Err(message)) => Err(HandlerError::MalformedOutput(message)),
                None => Err(HandlerError::MalformedOutput("FakePatternDetector has no configured result".to_string())),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePatternDetector;
