//! Reflective type handles.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::base::constants::NS_SEPARATOR;
use crate::base::{last_segment, strip_leading_separator};
use crate::scan::TypeKind;

/// A live handle to a class-like type, as produced by a [`super::TypeRegistry`].
///
/// Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    name: Arc<str>,
    kind: TypeKind,
    file: Option<Arc<Path>>,
}

impl TypeHandle {
    /// Create a handle. A leading `\` on `name` is dropped.
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: Arc::from(strip_leading_separator(name)),
            kind,
            file: None,
        }
    }

    /// Attach the file the type is declared in.
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(Arc::from(file.as_ref()));
        self
    }

    /// Fully-qualified name without a leading `\`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Hello\World\Foo` → `Foo`.
    pub fn short_name(&self) -> &str {
        last_segment(&self.name)
    }

    /// `Hello\World\Foo` → `Hello\World`; empty for global types.
    pub fn namespace_name(&self) -> &str {
        match self.name.rfind(NS_SEPARATOR) {
            Some(pos) => &self.name[..pos],
            None => "",
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.kind, NS_SEPARATOR, self.name)
    }
}
