//! Snapshot caching
//!
//! Scanning is cheap but not free; a [`CacheProvider`] lets repeated opens
//! of an unchanged file skip it.
//!
//! - [`FileCache`] - one JSON entry per key on disk, freshness by mtime
//! - [`MemoryCache`] - an in-process map, for tests and short-lived tools

mod file_cache;
mod memory;

pub use file_cache::FileCache;
pub use memory::MemoryCache;

use std::sync::Arc;

use crate::base::Timestamp;
use crate::error::Result;
use crate::scan::Snapshot;

/// Storage for scan snapshots, keyed by an opaque string.
///
/// `read` must return a stored snapshot whose tag is at least `freshness`,
/// or call `recompute` exactly once, store the result tagged with a
/// timestamp `>= freshness`, and return it. Errors from `recompute` are
/// returned as-is and nothing is stored.
///
/// Providers may be shared between threads. Two concurrent misses on the
/// same key may both recompute; the last write wins.
pub trait CacheProvider: Send + Sync {
    fn read(
        &self,
        key: &str,
        freshness: Timestamp,
        recompute: &mut dyn FnMut() -> Result<Snapshot>,
    ) -> Result<Snapshot>;
}

impl<T: CacheProvider + ?Sized> CacheProvider for Arc<T> {
    fn read(
        &self,
        key: &str,
        freshness: Timestamp,
        recompute: &mut dyn FnMut() -> Result<Snapshot>,
    ) -> Result<Snapshot> {
        (**self).read(key, freshness, recompute)
    }
}
