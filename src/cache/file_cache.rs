//! On-disk snapshot cache.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::CacheProvider;
use crate::base::constants::CACHE_FILE_EXTENSION;
use crate::base::{Timestamp, from_system_time, now, to_system_time};
use crate::error::{ReflectionError, Result};
use crate::scan::Snapshot;

/// Length of a hex-encoded SHA-256 digest.
const KEY_HASH_LEN: usize = 64;

/// Stores each snapshot as `<root>/<sha256(key)>.json`.
///
/// The entry's modification time is its freshness tag. Entries are written
/// to a temporary file in the same directory and renamed into place, so
/// readers never see a partial entry.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
    file_mode: Option<u32>,
    create_dirs: bool,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_mode: None,
            create_dirs: false,
        }
    }

    /// Permission bits applied to every entry written (Unix only).
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = Some(mode);
        self
    }

    /// Create the cache root on first write if it does not exist.
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the entry for `key` lives.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", hash_key(key), CACHE_FILE_EXTENSION))
    }

    /// Remove every cache entry under the root. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(ReflectionError::storage_io(&self.root, &e)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| ReflectionError::storage_io(&self.root, &e))?
                .path();
            if !is_entry_file(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(ReflectionError::storage_io(&path, &e)),
            }
        }
        debug!("[CACHE] cleared {} entries from {}", removed, self.root.display());
        Ok(removed)
    }

    /// A fresh, current-version snapshot, or `None` for any kind of miss.
    fn load(&self, path: &Path, freshness: Timestamp) -> Result<Option<Snapshot>> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ReflectionError::storage_io(path, &e)),
        };
        let tag = metadata
            .modified()
            .map(from_system_time)
            .map_err(|e| ReflectionError::storage_io(path, &e))?;
        if tag < freshness {
            debug!("[CACHE] stale entry {} ({} < {})", path.display(), tag, freshness);
            return Ok(None);
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ReflectionError::storage_io(path, &e)),
        };
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) if snapshot.is_current() => Ok(Some(snapshot)),
            Ok(snapshot) => {
                debug!(
                    "[CACHE] entry {} has version {}, recomputing",
                    path.display(),
                    snapshot.version
                );
                Ok(None)
            }
            Err(e) => {
                warn!("[CACHE] discarding unreadable entry {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn store(&self, path: &Path, snapshot: &Snapshot, freshness: Timestamp) -> Result<()> {
        if self.create_dirs {
            fs::create_dir_all(&self.root)
                .map_err(|e| ReflectionError::storage_io(&self.root, &e))?;
        }

        let json = serde_json::to_vec(snapshot)
            .map_err(|e| ReflectionError::storage(path, e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(&self.root)
            .map_err(|e| ReflectionError::storage_io(&self.root, &e))?;
        tmp.write_all(&json)
            .map_err(|e| ReflectionError::storage_io(tmp.path(), &e))?;
        self.apply_file_mode(tmp.as_file(), path)?;

        // The clock may lag behind the source file's mtime.
        let tag = now().max(freshness);
        tmp.as_file()
            .set_modified(to_system_time(tag))
            .map_err(|e| ReflectionError::storage_io(path, &e))?;

        tmp.persist(path)
            .map_err(|e| ReflectionError::storage_io(path, &e.error))?;
        debug!("[CACHE] wrote {} (tag {})", path.display(), tag);
        Ok(())
    }

    #[cfg(unix)]
    fn apply_file_mode(&self, file: &fs::File, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        match self.file_mode {
            Some(mode) => file
                .set_permissions(fs::Permissions::from_mode(mode))
                .map_err(|e| ReflectionError::storage_io(path, &e)),
            None => Ok(()),
        }
    }

    #[cfg(not(unix))]
    fn apply_file_mode(&self, _file: &fs::File, _path: &Path) -> Result<()> {
        Ok(())
    }
}

impl CacheProvider for FileCache {
    fn read(
        &self,
        key: &str,
        freshness: Timestamp,
        recompute: &mut dyn FnMut() -> Result<Snapshot>,
    ) -> Result<Snapshot> {
        let path = self.entry_path(key);
        if let Some(snapshot) = self.load(&path, freshness)? {
            debug!("[CACHE] hit {}", key);
            return Ok(snapshot);
        }

        debug!("[CACHE] miss {}", key);
        let snapshot = recompute()?;
        self.store(&path, &snapshot, freshness)?;
        Ok(snapshot)
    }
}

fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_entry_file(path: &Path) -> bool {
    let has_extension = path.extension().is_some_and(|ext| ext == CACHE_FILE_EXTENSION);
    let hashed_stem = path.file_stem().and_then(|stem| stem.to_str()).is_some_and(|stem| {
        stem.len() == KEY_HASH_LEN && stem.bytes().all(|b| b.is_ascii_hexdigit())
    });
    has_extension && hashed_stem
}
