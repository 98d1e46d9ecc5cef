//! Scan facts and their persistable snapshot form.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::constants::SNAPSHOT_VERSION;
use crate::parser::SyntaxKind;

/// Which keyword introduced a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl TypeKind {
    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::CLASS_KW => Some(Self::Class),
            SyntaxKind::INTERFACE_KW => Some(Self::Interface),
            SyntaxKind::TRAIT_KW => Some(Self::Trait),
            SyntaxKind::ENUM_KW => Some(Self::Enum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level type declaration, by fully-qualified name (no leading `\`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    pub kind: TypeKind,
}

impl DeclaredType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Everything the scanner learns about one file.
///
/// Built once by [`crate::scan::scan`] or [`ScanFacts::import`] and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFacts {
    /// `None`: no namespace declaration. `Some("")`: explicit global
    /// namespace block (`namespace { ... }`).
    namespace: Option<String>,
    /// Short name → fully-qualified name.
    aliases: IndexMap<String, String>,
    declared_types: Vec<DeclaredType>,
}

impl ScanFacts {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn aliases(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    /// Fully-qualified target of an import alias.
    pub fn alias(&self, short_name: &str) -> Option<&str> {
        self.aliases.get(short_name).map(String::as_str)
    }

    pub fn declared_types(&self) -> &[DeclaredType] {
        &self.declared_types
    }

    /// Fully-qualified declared names, in declaration order.
    pub fn declared_type_names(&self) -> impl Iterator<Item = &str> {
        self.declared_types.iter().map(|t| t.name.as_str())
    }

    /// Export into the persistable form.
    pub fn export(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            namespace: self.namespace.clone(),
            aliases: self.aliases.clone(),
            declared_types: self.declared_types.clone(),
        }
    }

    /// Rebuild facts from a snapshot without re-scanning.
    pub fn import(snapshot: Snapshot) -> Self {
        Self {
            namespace: snapshot.namespace,
            aliases: snapshot.aliases,
            declared_types: snapshot.declared_types,
        }
    }

    pub(super) fn set_namespace(&mut self, namespace: String) {
        self.namespace = Some(namespace);
    }

    /// Record an alias. Returns the target it replaced, if any (last wins).
    pub(super) fn insert_alias(&mut self, short_name: String, target: String) -> Option<String> {
        self.aliases.insert(short_name, target)
    }

    pub(super) fn push_type(&mut self, declared: DeclaredType) {
        self.declared_types.push(declared);
    }
}

/// Serialized form of [`ScanFacts`], stored by cache providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub namespace: Option<String>,
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
    #[serde(default)]
    pub declared_types: Vec<DeclaredType>,
}

impl Snapshot {
    /// Whether this snapshot was written by the current format version.
    pub fn is_current(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }
}

impl From<&ScanFacts> for Snapshot {
    fn from(facts: &ScanFacts) -> Self {
        facts.export()
    }
}

impl From<Snapshot> for ScanFacts {
    fn from(snapshot: Snapshot) -> Self {
        ScanFacts::import(snapshot)
    }
}
