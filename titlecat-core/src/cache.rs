//! Result cache
//!
//! Bounded LRU memoization of categorization results, keyed by the
//! normalized title text plus the taxonomy version it was computed
//! against. Entries from an old taxonomy version stay valid after a
//! reload (the version component isolates them) and simply age out.
//!
//! Concurrent requests for the same uncached key may race to compute;
//! the pipeline is pure and idempotent, so duplicate work is acceptable
//! and all readers converge on a cached value after the first insert.
//! The lock is never held across a computation.

use crate::result::Categorization;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use uuid::Uuid;

/// Cache key: normalized title text + taxonomy snapshot identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub normalized_title: String,
    pub taxonomy_version: Uuid,
}

impl CacheKey {
    pub fn new(normalized_title: String, taxonomy_version: Uuid) -> Self {
        Self {
            normalized_title,
            taxonomy_version,
        }
    }
}

/// Bounded LRU cache of categorization results
pub struct ResultCache {
    entries: Mutex<LruCache<CacheKey, Arc<Categorization>>>,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a key, promoting it to most-recently-used on a hit
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Categorization>> {
        self.entries.lock().get(key).cloned()
    }

    /// Return the cached value for `key`, computing and inserting it on a miss
    ///
    /// `compute` runs outside the lock, so concurrent callers may compute
    /// the same key in parallel; the last insert wins and subsequent reads
    /// see one canonical value.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Arc<Categorization>
    where
        F: FnOnce() -> Categorization,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = Arc::new(compute());
        self.entries.lock().put(key, Arc::clone(&value));
        value
    }

    /// Number of currently cached entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
