// SPDX-License-Identifier: MIT

//! `job_id` input sanitization.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static JOB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,100}$").expect("constant regex pattern is valid"));

pub fn is_valid_job_id(id: &str) -> bool {
    JOB_ID_RE.is_match(id)
}

#[cfg(test)]
#[path = "job_id_tests.rs"]
mod tests;
