//! Error types for reflection and cache operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced by [`crate::ReflectionFile`] and cache providers.
///
/// Scanning itself never fails; malformed source yields partial facts.
#[derive(Debug, Error)]
pub enum ReflectionError {
    /// A cache entry could not be read, written or given its metadata.
    #[error("cache storage fault at {}: {message}", path.display())]
    StorageFault { path: PathBuf, message: String },

    /// A pseudo-type (`int`, `string`, ...) was asked for as a concrete type.
    #[error("'{0}' is a pseudo-type, not a class-like type")]
    InvalidName(String),

    /// The resolved name is not known to the type registry.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The source file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReflectionError {
    /// Create a storage fault for a cache path.
    pub fn storage(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::StorageFault {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a storage fault from an I/O error.
    pub fn storage_io(path: impl AsRef<Path>, err: &io::Error) -> Self {
        Self::storage(path, err.to_string())
    }

    /// Create a source read error.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Self::StorageFault { .. })
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, ReflectionError>;
