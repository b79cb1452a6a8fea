// SPDX-License-Identifier: MIT

//! scanforge-cache: content-addressed scan result caching.
//!
//! Keys are derived from a repository path and a short git commit; entries
//! carry a TTL-free age (callers decide staleness) and can be invalidated
//! in bulk by repository path. Backend failures never surface to callers —
//! see [`error::CacheError`] and [`cache::ScanCache`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod backend;
mod cache;
mod entry;
mod error;
mod key;

pub use backend::{CacheBackend, InMemoryBackend};
pub use cache::ScanCache;
pub use entry::{CacheAge, CacheEntry, CacheHitMetadata, CacheMetadata, CacheStats};
pub use error::CacheError;
pub use key::{cache_key, DEFAULT_PREFIX};
