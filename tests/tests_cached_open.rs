//! Opening files through cache providers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use filereflect::{
    CacheProvider, FileCache, MemoryCache, ReflectionError, ReflectionFile, Result, Snapshot,
    Timestamp,
};
use tempfile::TempDir;

/// Counts how often the wrapped provider asks for a recompute.
struct Counting<C> {
    inner: C,
    recomputes: AtomicUsize,
}

impl<C> Counting<C> {
    fn new(inner: C) -> Self {
        Self {
            inner,
            recomputes: AtomicUsize::new(0),
        }
    }

    fn recomputes(&self) -> usize {
        self.recomputes.load(Ordering::SeqCst)
    }
}

impl<C: CacheProvider> CacheProvider for Counting<C> {
    fn read(
        &self,
        key: &str,
        freshness: Timestamp,
        recompute: &mut dyn FnMut() -> Result<Snapshot>,
    ) -> Result<Snapshot> {
        self.inner.read(key, freshness, &mut || {
            self.recomputes.fetch_add(1, Ordering::SeqCst);
            recompute()
        })
    }
}

fn write_source(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

/// Push a file's mtime forward so the next open sees it as changed.
fn touch_future(path: &Path, secs: u64) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(secs))
        .unwrap();
}

#[test]
fn test_file_cache_scans_once_until_source_changes() {
    let sources = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = Counting::new(FileCache::new(cache_dir.path()));
    let path = write_source(sources.path(), "Foo.php", "<?php\nnamespace A;\nclass Foo {}\n");

    let first = ReflectionFile::open_cached(&path, &cache).unwrap();
    let second = ReflectionFile::open_cached(&path, &cache).unwrap();
    assert_eq!(cache.recomputes(), 1);
    assert_eq!(first.facts(), second.facts());

    fs::write(&path, "<?php\nnamespace B;\nclass Foo {}\nclass Bar {}\n").unwrap();
    touch_future(&path, 120);

    let third = ReflectionFile::open_cached(&path, &cache).unwrap();
    assert_eq!(cache.recomputes(), 2);
    assert_eq!(third.namespace(), Some("B"));
    assert_eq!(third.declared_type_names(), vec!["B\\Foo", "B\\Bar"]);

    let fourth = ReflectionFile::open_cached(&path, &cache).unwrap();
    assert_eq!(cache.recomputes(), 2);
    assert_eq!(fourth.facts(), third.facts());
}

#[test]
fn test_cached_facts_match_direct_scan() {
    let sources = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileCache::new(cache_dir.path());
    let path = write_source(
        sources.path(),
        "C.php",
        "<?php\nnamespace Hello\\World;\nuse Other\\World\\Nib as Fud;\nclass Foo {}\n",
    );

    ReflectionFile::open_cached(&path, &cache).unwrap();
    let cached = ReflectionFile::open_cached(&path, &cache).unwrap();
    let direct = ReflectionFile::open(&path).unwrap();

    assert_eq!(cached.facts(), direct.facts());
    assert_eq!(cached.resolve("Fud"), "\\Other\\World\\Nib");
}

#[test]
fn test_memory_cache_behaves_the_same() {
    let sources = TempDir::new().unwrap();
    let cache = Counting::new(MemoryCache::new());
    let path = write_source(sources.path(), "M.php", "<?php\ntrait M {}\n");

    ReflectionFile::open_with(&path, Some(&cache)).unwrap();
    ReflectionFile::open_with(&path, Some(&cache)).unwrap();
    assert_eq!(cache.recomputes(), 1);

    touch_future(&path, 60);
    ReflectionFile::open_with(&path, Some(&cache)).unwrap();
    assert_eq!(cache.recomputes(), 2);
}

#[test]
fn test_uncached_open_never_touches_cache() {
    let sources = TempDir::new().unwrap();
    let path = write_source(sources.path(), "U.php", "<?php\nclass U {}\n");
    let file = ReflectionFile::open_with(&path, None).unwrap();
    assert_eq!(file.declared_type_names(), vec!["U"]);
}

#[test]
fn test_storage_fault_surfaces() {
    let sources = TempDir::new().unwrap();
    let path = write_source(sources.path(), "S.php", "<?php\nclass S {}\n");
    let cache = FileCache::new(sources.path().join("no-such-dir"));

    let err = ReflectionFile::open_cached(&path, &cache).unwrap_err();
    assert!(matches!(err, ReflectionError::StorageFault { .. }), "{err}");
}

#[test]
fn test_missing_source_is_not_a_storage_fault() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path());
    let err = ReflectionFile::open_cached(dir.path().join("gone.php"), &cache).unwrap_err();
    assert!(matches!(err, ReflectionError::Io { .. }));
}

#[test]
fn test_shared_cache_across_threads() {
    let sources = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileCache::new(cache_dir.path());
    let path = write_source(sources.path(), "T.php", "<?php\nnamespace T;\nclass One {}\n");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let file = ReflectionFile::open_cached(&path, &cache).unwrap();
                assert_eq!(file.declared_type_names(), vec!["T\\One"]);
            });
        }
    });
    assert_eq!(cache.clear().unwrap(), 1);
}
