// SPDX-License-Identifier: MIT

//! API-surface pagination parsing: raw query-string values in, sanitized
//! `(limit, offset)` out. Parse failures fall back to policy defaults
//! rather than rejecting the request.

pub use scanforge_store::{sanitize_pagination, DEFAULT_LIMIT, MAX_LIMIT};

/// Parse `limit`/`offset` query parameters, substituting the default limit
/// on a missing or unparseable value and clamping via
/// [`sanitize_pagination`].
pub fn parse_pagination(limit: Option<&str>, offset: Option<&str>) -> (usize, usize) {
    let limit = limit.and_then(|v| v.parse::<usize>().ok()).unwrap_or(DEFAULT_LIMIT);
    let offset = offset.and_then(|v| v.parse::<usize>().ok()).unwrap_or(0);
    sanitize_pagination(limit, offset)
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
