// SPDX-License-Identifier: MIT

//! Governor-backed rate limiters: a normal I/O-bound limiter, a stricter
//! limiter for scan-initiation endpoints, and a bulk-import limiter.
//! Dashboard read paths are exempt from the normal limiter.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[allow(clippy::expect_used)]
fn nonzero(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("rate limit quota must be nonzero")
}

const DASHBOARD_READ_PREFIXES: &[&str] = &["/api/status", "/api/pipelines", "/api/reports"];

pub struct RateLimitPolicy {
    normal: Limiter,
    scan_initiation: Limiter,
    bulk_import: Limiter,
}

impl RateLimitPolicy {
    pub fn new(normal_per_minute: u32, scan_per_minute: u32, bulk_import_per_minute: u32) -> Self {
        Self {
            normal: Limiter::direct(Quota::per_minute(nonzero(normal_per_minute))),
            scan_initiation: Limiter::direct(Quota::per_minute(nonzero(scan_per_minute))),
            bulk_import: Limiter::direct(Quota::per_minute(nonzero(bulk_import_per_minute))),
        }
    }

    /// Dashboard read paths on `GET` bypass the normal limiter entirely.
    pub fn is_dashboard_read_exempt(method: &str, path: &str) -> bool {
        method.eq_ignore_ascii_case("GET") && DASHBOARD_READ_PREFIXES.iter().any(|p| path.starts_with(p))
    }

    pub fn check_normal(&self, method: &str, path: &str) -> RateLimitDecision {
        if Self::is_dashboard_read_exempt(method, path) {
            return RateLimitDecision::Allowed;
        }
        decision_from(self.normal.check())
    }

    pub fn check_scan_initiation(&self) -> RateLimitDecision {
        decision_from(self.scan_initiation.check())
    }

    pub fn check_bulk_import(&self) -> RateLimitDecision {
        decision_from(self.bulk_import.check())
    }
}

impl Default for RateLimitPolicy {
    /// 120 requests/minute normal, 10/minute scan-initiation, 5/minute bulk import.
    fn default() -> Self {
        Self::new(120, 10, 5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

fn decision_from<E>(result: Result<(), governor::NotUntil<E>>) -> RateLimitDecision
where
    E: governor::clock::Clock,
{
    match result {
        Ok(()) => RateLimitDecision::Allowed,
        Err(not_until) => RateLimitDecision::Limited {
            retry_after_secs: not_until.wait_time_from(not_until.earliest_possible()).as_secs().max(1),
        },
    }
}

/// `429` response body shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    pub error: String,
    pub message: String,
    pub retry_after: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl RateLimitResponse {
    pub fn new(retry_after_secs: u64, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            error: "Too Many Requests".to_string(),
            message: format!("rate limit exceeded, retry after {retry_after_secs}s"),
            retry_after: retry_after_secs,
            timestamp: now,
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
