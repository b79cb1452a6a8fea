// SPDX-License-Identifier: MIT

//! scanforge-scan: the scan-result envelope, the `PatternDetector`
//! sub-process boundary, and the cache-vs-compute decision that composes
//! them with `scanforge-cache`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod cached_scanner;
mod detector;
mod error;
mod result;

pub use cached_scanner::{cache_status, scan, should_use_cache, CacheStatus, CacheStatusReason, ScanServiceConfig};
pub use detector::{ExternalScannerShim, PatternDetector, ScanOptions, ScanRequest};
pub use error::HandlerError;
pub use result::{DuplicateGroup, ScanMetrics, ScanResult, ScanType, HIGH_IMPACT_THRESHOLD};

#[cfg(any(test, feature = "test-support"))]
pub use detector::FakePatternDetector;
