// SPDX-License-Identifier: MIT

//! Cache key construction.

use sha2::{Digest, Sha256};

/// Default key prefix for scan cache entries.
pub const DEFAULT_PREFIX: &str = "scanforge:scan";

/// Build the `<prefix>:<repo-path-hash>:<short-commit>` cache key.
///
/// The path component is hashed rather than used verbatim so that keys stay
/// a fixed, filesystem/backend-friendly length regardless of how deep the
/// repository path is.
pub fn cache_key(prefix: &str, repo_path: &str, short_commit: &str) -> String {
    format!("{prefix}:{}:{short_commit}", hash_path(repo_path))
}

fn hash_path(repo_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repo_path.as_bytes());
    let digest = hasher.finalize();
    // Sixteen hex chars (64 bits) is ample to avoid collisions among the
    // repositories a single scan root would ever contain.
    hex::encode(digest)[..16].to_string()
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
