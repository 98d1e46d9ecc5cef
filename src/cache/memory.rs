//! In-process snapshot cache.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::CacheProvider;
use crate::base::{Timestamp, now};
use crate::error::Result;
use crate::scan::Snapshot;

/// Keeps snapshots in a map guarded by a read-write lock.
///
/// Entries are tagged with `max(now, freshness)` when stored.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<FxHashMap<String, (Timestamp, Snapshot)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop the entry for `key`. Returns whether one existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn lookup(&self, key: &str, freshness: Timestamp) -> Option<Snapshot> {
        let entries = self.entries.read();
        let (tag, snapshot) = entries.get(key)?;
        (*tag >= freshness && snapshot.is_current()).then(|| snapshot.clone())
    }
}

impl CacheProvider for MemoryCache {
    fn read(
        &self,
        key: &str,
        freshness: Timestamp,
        recompute: &mut dyn FnMut() -> Result<Snapshot>,
    ) -> Result<Snapshot> {
        if let Some(snapshot) = self.lookup(key, freshness) {
            debug!("[CACHE] memory hit {}", key);
            return Ok(snapshot);
        }

        debug!("[CACHE] memory miss {}", key);
        // Recompute without holding the lock
        let snapshot = recompute()?;
        let tag = now().max(freshness);
        self.entries
            .write()
            .insert(key.to_string(), (tag, snapshot.clone()));
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReflectionError;
    use crate::scan::scan_source;

    fn snapshot() -> Snapshot {
        scan_source("<?php\nnamespace M;\nclass C {}\n").export()
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = MemoryCache::new();
        let mut calls = 0;
        let mut recompute = || -> Result<Snapshot> {
            calls += 1;
            Ok(snapshot())
        };

        let first = cache.read("k", 10, &mut recompute).unwrap();
        let second = cache.read("k", 10, &mut recompute).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_freshness_in_the_future_forces_recompute() {
        let cache = MemoryCache::new();
        let future = now() + 3600;
        let mut calls = 0;
        let mut recompute = || -> Result<Snapshot> {
            calls += 1;
            Ok(snapshot())
        };

        cache.read("k", 0, &mut recompute).unwrap();
        cache.read("k", future, &mut recompute).unwrap();
        // Stored with the future tag, so this one hits
        cache.read("k", future, &mut recompute).unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_recompute_error_stores_nothing() {
        let cache = MemoryCache::new();
        let err = cache
            .read("k", 0, &mut || Err(ReflectionError::storage("k", "boom")))
            .unwrap_err();
        assert!(err.is_storage_fault());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = MemoryCache::new();
        cache.read("a", 0, &mut || Ok(snapshot())).unwrap();
        cache.read("b", 0, &mut || Ok(snapshot())).unwrap();

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
