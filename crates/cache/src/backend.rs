// SPDX-License-Identifier: MIT

//! Pluggable storage backend for cache entries.
//!
//! The design notes call out that the backend is swappable (hash/list store,
//! table store, filesystem store) as long as it supports point lookups keyed
//! by the cache key and a reverse scan keyed by `repository_path` for
//! invalidation. `InMemoryBackend` is the one concrete implementation
//! shipped here; a durable backend (e.g. backed by `scanforge-store`'s
//! append log) can implement the same trait.

use crate::entry::CacheEntry;
use crate::error::CacheError;
use parking_lot::RwLock;
use std::collections::HashMap;

pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    fn put(&self, key: String, entry: CacheEntry) -> Result<(), CacheError>;
    /// Remove every entry whose `repository_path` equals `repository_path`.
    /// Returns the number of entries removed.
    fn remove_by_repository(&self, repository_path: &str) -> Result<usize, CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
    /// Keys in most-recently-written-first order.
    fn recent_keys(&self, limit: usize) -> Result<Vec<String>, CacheError>;
    fn len(&self) -> Result<usize, CacheError>;
}

/// In-process cache backend. This is the default backend; it holds no
/// cross-process durability and does not survive a restart.
#[derive(Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Insertion order, most recent last; used for `recent_keys`.
    order: RwLock<Vec<String>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: String, entry: CacheEntry) -> Result<(), CacheError> {
        let mut order = self.order.write();
        order.retain(|k| k != &key);
        order.push(key.clone());
        self.entries.write().insert(key, entry);
        Ok(())
    }

    fn remove_by_repository(&self, repository_path: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.write();
        let to_remove: Vec<String> = entries
            .iter()
            .filter(|(_, v)| v.repository_path == repository_path)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &to_remove {
            entries.remove(key);
        }
        drop(entries);
        let mut order = self.order.write();
        order.retain(|k| !to_remove.contains(k));
        Ok(to_remove.len())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().clear();
        self.order.write().clear();
        Ok(())
    }

    fn recent_keys(&self, limit: usize) -> Result<Vec<String>, CacheError> {
        let order = self.order.read();
        Ok(order.iter().rev().take(limit).cloned().collect())
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entries.read().len())
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
