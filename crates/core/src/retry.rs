// SPDX-License-Identifier: MIT

//! Retry bookkeeping shared between the Job Server and its metrics surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cap on retry attempts before a job is left in its terminal `failed` state.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Tracks how many times a job (by its original id) has been retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryEntry {
    pub attempts: u32,
    pub last_attempt: DateTime<Utc>,
    pub max_attempts: u32,
    #[serde(with = "duration_ms")]
    pub delay: Duration,
}

impl RetryEntry {
    pub fn first(now: DateTime<Utc>, delay: Duration) -> Self {
        Self { attempts: 1, last_attempt: now, max_attempts: DEFAULT_MAX_ATTEMPTS, delay }
    }

    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// "Nearing limit" classification used by retry metrics: one attempt away
    /// from exhaustion or past it.
    pub fn nearing_limit(&self) -> bool {
        self.attempts + 1 >= self.max_attempts
    }
}

/// Derive the `<id>-retry<N>` job id for the next retry attempt.
pub fn derived_retry_id(original_id: &str, attempt: u32) -> String {
    format!("{original_id}-retry{attempt}")
}

/// Strip one or more trailing `-retry<digits>` suffixes to recover the id a
/// job was originally created with. Idempotent: applying it to an id that
/// already has no suffix returns the id unchanged.
pub fn original_job_id(id: &str) -> &str {
    let mut rest = id;
    loop {
        match strip_one_retry_suffix(rest) {
            Some(stripped) => rest = stripped,
            None => return rest,
        }
    }
}

fn strip_one_retry_suffix(id: &str) -> Option<&str> {
    let idx = id.rfind("-retry")?;
    let digits = &id[idx + "-retry".len()..];
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(&id[..idx])
    } else {
        None
    }
}

/// Aggregate retry metrics reported by `get_stats`/`retry_metrics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryMetrics {
    pub active_retries: usize,
    pub total_retry_attempts: u32,
    pub jobs_being_retried: Vec<String>,
    pub retry_distribution: RetryDistribution,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryDistribution {
    pub attempt1: usize,
    pub attempt2: usize,
    pub attempt3_plus: usize,
    pub nearing_limit: usize,
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(d)?;
        Ok(Duration::from_millis(ms))
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
