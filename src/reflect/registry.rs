//! Type registries: where declared names become live handles.

use rustc_hash::FxHashMap;
use tracing::trace;

use super::{ReflectionFile, TypeHandle};
use crate::base::strip_leading_separator;

/// Looks up loaded types by fully-qualified name (no leading `\`).
///
/// `None` means the type does not exist as far as the registry knows.
pub trait TypeRegistry {
    fn lookup(&self, name: &str) -> Option<TypeHandle>;
}

impl<F> TypeRegistry for F
where
    F: Fn(&str) -> Option<TypeHandle>,
{
    fn lookup(&self, name: &str) -> Option<TypeHandle> {
        self(name)
    }
}

/// An in-memory registry built from reflected files.
///
/// Lookups ignore ASCII case, like PHP class names.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: FxHashMap<String, TypeHandle>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every type declared in `file`. Returns how many were added.
    pub fn register_file(&mut self, file: &ReflectionFile) -> usize {
        let mut added = 0;
        for declared in file.facts().declared_types() {
            let handle = TypeHandle::new(&declared.name, declared.kind).with_file(file.path());
            if self.register(handle).is_none() {
                added += 1;
            }
        }
        trace!(
            "[INDEX] {} types from {}",
            added,
            file.path().display()
        );
        added
    }

    /// Register a handle, returning the one it replaced.
    pub fn register(&mut self, handle: TypeHandle) -> Option<TypeHandle> {
        self.types.insert(index_key(handle.name()), handle)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(&index_key(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeHandle> {
        self.types.values()
    }
}

impl TypeRegistry for TypeIndex {
    fn lookup(&self, name: &str) -> Option<TypeHandle> {
        self.types.get(&index_key(name)).cloned()
    }
}

fn index_key(name: &str) -> String {
    strip_leading_separator(name).to_ascii_lowercase()
}
