//! Memoization of constructed loaders across compile jobs.
//!
//! Re-indexing an identical root set for every batch is wasted IO, so a
//! build driver may keep a [`LoaderCache`] alive between jobs and key it by
//! a canonicalized root-set signature. The cache is an explicit value owned
//! by the driver, not process-global state; callers choose its lifetime and
//! key stability.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::classpath::ClasspathLoader;

/// Hit/miss counters, maintained on every lookup for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups that returned a stored loader.
    pub hits: u64,
    /// Lookups that returned nothing (including all lookups while disabled).
    pub misses: u64,
}

/// Key-value store of constructed loaders.
///
/// Disabled by default: `get` then always answers absent and `put` is a
/// no-op, but counters still track every lookup. Entries have no eviction
/// policy; they live until [`LoaderCache::clear`]. Stored loaders are shared
/// through `Arc`, which is safe because loaders are immutable after
/// construction.
#[derive(Default)]
pub struct LoaderCache {
    enabled: bool,
    entries: HashMap<String, Arc<dyn ClasspathLoader>>,
    stats: CacheStats,
}

impl LoaderCache {
    /// Create a cache; pass `false` to keep the feature disabled.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Whether the cache feature is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a stored loader. Counts a hit or miss regardless of
    /// enablement.
    pub fn get(&mut self, key: &str) -> Option<Arc<dyn ClasspathLoader>> {
        if self.enabled {
            if let Some(loader) = self.entries.get(key) {
                self.stats.hits += 1;
                return Some(Arc::clone(loader));
            }
        }
        self.stats.misses += 1;
        debug!(key, enabled = self.enabled, "loader cache miss");
        None
    }

    /// Store a loader under the given key. No-op while disabled;
    /// last-write-wins on key collision.
    pub fn put(&mut self, key: impl Into<String>, loader: Arc<dyn ClasspathLoader>) {
        if self.enabled {
            self.entries.insert(key.into(), loader);
        }
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for LoaderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderCache")
            .field("enabled", &self.enabled)
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}
