//! Reflection over a single PHP file
//!
//! - [`ReflectionFile`] - scan facts for one file plus name resolution
//! - [`TypeRegistry`] - injected lookup from qualified names to handles
//! - [`TypeIndex`] - the in-memory registry shipped with the crate
//! - [`TypeHandle`] - a resolved class, interface, trait or enum

mod file;
mod handle;
mod registry;

pub use file::{ReflectionFile, load_or_scan};
pub use handle::TypeHandle;
pub use registry::{TypeIndex, TypeRegistry};
