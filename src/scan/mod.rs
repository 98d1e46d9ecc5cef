//! File scanning
//!
//! Walks the token stream of one PHP file and records what is needed to
//! resolve names in it:
//! - [`ScanFacts`] - namespace, import aliases, declared types
//! - [`Snapshot`] - the persistable form handed to cache providers
//! - [`scan`] / [`scan_source`] - the scanner entry points

mod facts;
mod scanner;

pub use facts::{DeclaredType, ScanFacts, Snapshot, TypeKind};
pub use scanner::{scan, scan_source};
