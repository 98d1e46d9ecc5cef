//! `ReflectionFile`: the facts of one source file, plus resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

use super::{TypeHandle, TypeRegistry};
use crate::base::{Timestamp, modified_timestamp};
use crate::cache::CacheProvider;
use crate::error::{ReflectionError, Result};
use crate::resolve;
use crate::scan::{ScanFacts, Snapshot, scan_source};

/// Reflection over a single PHP file.
///
/// Facts are gathered once, either by scanning or from a cached snapshot,
/// and never change afterwards. Declared-type handles are looked up on
/// first request and memoized.
#[derive(Debug)]
pub struct ReflectionFile {
    path: PathBuf,
    facts: ScanFacts,
    types: OnceLock<Vec<TypeHandle>>,
}

impl ReflectionFile {
    /// Scan the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, None)
    }

    /// Load facts through `cache`, scanning only on a miss.
    pub fn open_cached(path: impl AsRef<Path>, cache: &dyn CacheProvider) -> Result<Self> {
        Self::open_with(path, Some(cache))
    }

    /// Load facts, going through `cache` when one is given.
    ///
    /// The cache key is the path and the freshness timestamp is the source
    /// file's modification time, so an edited file is always rescanned.
    pub fn open_with(path: impl AsRef<Path>, cache: Option<&dyn CacheProvider>) -> Result<Self> {
        let path = path.as_ref();
        let facts = match cache {
            None => scan_file(path)?,
            Some(provider) => {
                let freshness =
                    modified_timestamp(path).map_err(|e| ReflectionError::io(path, e))?;
                load_or_scan(path, Some(provider), freshness)?
            }
        };
        Ok(Self::with_facts(path.to_path_buf(), facts))
    }

    /// Scan in-memory source text attributed to `path`.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Self {
        Self::with_facts(path.into(), scan_source(source))
    }

    /// Rebuild from a snapshot without touching the file.
    pub fn from_snapshot(path: impl Into<PathBuf>, snapshot: Snapshot) -> Self {
        Self::with_facts(path.into(), ScanFacts::import(snapshot))
    }

    fn with_facts(path: PathBuf, facts: ScanFacts) -> Self {
        Self {
            path,
            facts,
            types: OnceLock::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.facts.export()
    }

    pub fn facts(&self) -> &ScanFacts {
        &self.facts
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared namespace; `None` when the file has no namespace statement.
    pub fn namespace(&self) -> Option<&str> {
        self.facts.namespace()
    }

    /// Fully-qualified names of the top-level types, in declaration order.
    pub fn declared_type_names(&self) -> Vec<&str> {
        self.facts.declared_type_names().collect()
    }

    /// Handles for every declared type, looked up in `registry`.
    ///
    /// The first successful call is memoized; later calls return the same
    /// handles whatever registry they pass.
    pub fn declared_types(&self, registry: &dyn TypeRegistry) -> Result<&[TypeHandle]> {
        if let Some(types) = self.types.get() {
            return Ok(types);
        }

        let handles = self
            .facts
            .declared_type_names()
            .map(|name| {
                registry
                    .lookup(name)
                    .ok_or_else(|| ReflectionError::UnknownType(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.types.get_or_init(|| handles))
    }

    /// Resolve `name` in this file and look it up in `registry`.
    pub fn get_type(&self, registry: &dyn TypeRegistry, name: &str) -> Result<TypeHandle> {
        resolve::get_type(&self.facts, registry, name)
    }

    /// Fully-qualified form of `name` as written in this file.
    pub fn resolve(&self, name: &str) -> String {
        resolve::resolve_name(&self.facts, name)
    }

    pub fn is_pseudo_type(name: &str) -> bool {
        resolve::is_pseudo_type(name)
    }
}

/// Facts for the file at `path`, through `cache` when one is given.
///
/// The cache key is the path. A cached snapshot is used only if it is at
/// least as new as `freshness`; otherwise the file is scanned and the
/// result stored.
pub fn load_or_scan(
    path: &Path,
    cache: Option<&dyn CacheProvider>,
    freshness: Timestamp,
) -> Result<ScanFacts> {
    let Some(cache) = cache else {
        return scan_file(path);
    };

    let key = path.to_string_lossy();
    let mut recompute = || scan_file(path).map(|facts| facts.export());
    let snapshot = cache.read(&key, freshness, &mut recompute)?;
    Ok(ScanFacts::import(snapshot))
}

fn scan_file(path: &Path) -> Result<ScanFacts> {
    let bytes = fs::read(path).map_err(|e| ReflectionError::io(path, e))?;
    debug!("[REFLECT] scanning {} ({} bytes)", path.display(), bytes.len());
    // PHP sources are not guaranteed to be UTF-8; names we care about are ASCII
    let source = String::from_utf8_lossy(&bytes);
    Ok(scan_source(&source))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::reflect::TypeIndex;
    use crate::scan::TypeKind;

    #[test]
    fn test_declared_types_are_memoized() {
        let file = ReflectionFile::from_source("a.php", "<?php\nclass A {}\nclass B {}\n");
        let calls = Cell::new(0);
        let registry = |name: &str| {
            calls.set(calls.get() + 1);
            Some(TypeHandle::new(name, TypeKind::Class))
        };

        let first = file.declared_types(&registry).unwrap().len();
        let second = file.declared_types(&registry).unwrap().len();
        assert_eq!((first, second), (2, 2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_declared_types_failure_is_not_memoized() {
        let file = ReflectionFile::from_source("a.php", "<?php\nnamespace N;\nclass A {}\n");
        let err = file.declared_types(&TypeIndex::new()).unwrap_err();
        assert!(matches!(err, ReflectionError::UnknownType(name) if name == "N\\A"));

        let mut index = TypeIndex::new();
        index.register_file(&file);
        let types = file.declared_types(&index).unwrap();
        assert_eq!(types[0].name(), "N\\A");
    }

    #[test]
    fn test_from_snapshot_matches_source() {
        let source = "<?php\nnamespace N;\nuse X\\Y;\nclass A {}\n";
        let scanned = ReflectionFile::from_source("a.php", source);
        let restored = ReflectionFile::from_snapshot("a.php", scanned.snapshot());
        assert_eq!(restored.facts(), scanned.facts());
        assert_eq!(restored.resolve("Y\\Z"), scanned.resolve("Y\\Z"));
    }

    #[test]
    fn test_load_or_scan_honors_explicit_freshness() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.php");
        fs::write(&path, "<?php\nclass A {}\n").unwrap();
        let cache = crate::cache::MemoryCache::new();

        let first = load_or_scan(&path, Some(&cache), 0).unwrap();
        fs::write(&path, "<?php\nclass B {}\n").unwrap();
        let cached = load_or_scan(&path, Some(&cache), 0).unwrap();
        assert_eq!(cached, first);

        let forced = load_or_scan(&path, Some(&cache), crate::base::now() + 60).unwrap();
        assert_eq!(forced.declared_type_names().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(load_or_scan(&path, None, 0).unwrap(), forced);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let err = ReflectionFile::open("/definitely/not/here.php").unwrap_err();
        assert!(matches!(err, ReflectionError::Io { .. }));
    }
}
