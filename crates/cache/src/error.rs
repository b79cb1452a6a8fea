// SPDX-License-Identifier: MIT

//! Cache backend errors. These are always swallowed by `ScanCache` itself —
//! callers never see them — but the backend trait still reports them so a
//! backend implementation can log or retry internally.

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache entry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
