//! # filereflect
//!
//! Structural reflection over single PHP source files: the declared
//! namespace, the imported aliases and the top-level type declarations,
//! gathered by a lexical scan without building a syntax tree, plus name
//! resolution on top of those facts.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! reflect   → ReflectionFile, TypeRegistry/TypeIndex, TypeHandle
//! resolve   → Pseudo-types, alias/namespace resolution, get_type
//!   ↓
//! cache     → CacheProvider, FileCache, MemoryCache
//!   ↓
//! scan      → Scanner state machine, ScanFacts, Snapshot
//!   ↓
//! parser    → Logos lexer with PHP lexing modes, SyntaxKind
//!   ↓
//! base      → Primitives (Timestamp, name helpers, constants)
//! ```
//!
//! ## Example
//!
//! ```
//! use filereflect::ReflectionFile;
//!
//! let file = ReflectionFile::from_source(
//!     "Foo.php",
//!     "<?php\nnamespace Hello\\World;\nuse Other\\World\\Nib as Fud;\nclass Foo {}\n",
//! );
//! assert_eq!(file.namespace(), Some("Hello\\World"));
//! assert_eq!(file.declared_type_names(), vec!["Hello\\World\\Foo"]);
//! assert_eq!(file.resolve("Fud"), "\\Other\\World\\Nib");
//! assert_eq!(file.resolve("string"), "string");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → scan → cache → resolve/reflect)
// ============================================================================

/// Foundation types: Timestamp, name helpers, constants
pub mod base;

/// Parser: Logos lexer and token kinds
pub mod parser;

/// Scanning: state machine over tokens, scan facts, snapshots
pub mod scan;

/// Name resolution against scan facts
pub mod resolve;

/// Snapshot caches
pub mod cache;

/// Reflection API: files, registries, type handles
pub mod reflect;

mod error;

pub use cache::{CacheProvider, FileCache, MemoryCache};
pub use error::{ReflectionError, Result};
pub use reflect::{ReflectionFile, TypeHandle, TypeIndex, TypeRegistry, load_or_scan};
pub use resolve::{is_pseudo_type, resolve_name};
pub use scan::{DeclaredType, ScanFacts, Snapshot, TypeKind};

// Re-export foundation types
pub use base::{TextRange, TextSize, Timestamp};
