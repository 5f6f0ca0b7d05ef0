//! Synchronous, unbounded block cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use tracing::debug;

use crate::key::BlockKey;
use crate::stats::CacheStats;

/// Shares decompressed blocks across lookups keyed by [`BlockKey`].
///
/// There is no eviction policy and no capacity limit; memory grows
/// with the number of distinct blocks touched until [`BlockCache::clear`]
/// is called. Reads of already-populated entries proceed concurrently
/// under the read-write lock; only a miss takes the write side, and
/// only for the instant it takes to insert the freshly loaded bytes.
#[derive(Debug, Default)]
pub struct BlockCache {
    entries: RwLock<HashMap<BlockKey, Arc<[u8]>>>,
    stats: CacheStats,
}

impl BlockCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::new(),
        }
    }

    /// Returns the cached block for `key`, or runs `load` and caches its result.
    ///
    /// `load` runs outside any lock held by this cache, so it may
    /// itself read a file and decompress it without risking a
    /// deadlock against a concurrent reader of this cache. If two
    /// threads miss on the same key concurrently, both may run
    /// `load`; only one insertion wins and the other's bytes are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns whatever `load` returns on failure; the cache is left
    /// unchanged.
    pub fn get_or_insert_with<F, E>(&self, key: BlockKey, load: F) -> Result<Arc<[u8]>, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        if let Some(existing) = self.entries.read().unwrap().get(&key) {
            self.stats.record_hit();
            return Ok(Arc::clone(existing));
        }

        self.stats.record_miss();
        let bytes: Arc<[u8]> = load()?.into();
        debug!(%key, len = bytes.len(), "decompressed block");

        let mut entries = self.entries.write().unwrap();
        Ok(Arc::clone(
            entries.entry(key).or_insert_with(|| bytes),
        ))
    }

    /// Drops every cached block, returning their memory.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Number of distinct blocks currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if no blocks are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit/miss counters accumulated since construction.
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
