//! Name resolution
//!
//! Turns a type reference as written in a file into its fully-qualified
//! form using the file's [`ScanFacts`]. Purely syntactic: nothing here
//! checks that the resolved type exists, except [`get_type`], which asks
//! an injected [`TypeRegistry`].

use std::sync::LazyLock;

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::base::constants::{NS_SEPARATOR, PSEUDO_TYPES};
use crate::base::{join_name, split_first_segment, strip_leading_separator};
use crate::error::{ReflectionError, Result};
use crate::reflect::{TypeHandle, TypeRegistry};
use crate::scan::ScanFacts;

static PSEUDO_TYPE_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| PSEUDO_TYPES.iter().copied().collect());

/// Whether `name` is a built-in pseudo-type (`int`, `string`, ...).
///
/// Case-sensitive: `String` is an ordinary class name.
pub fn is_pseudo_type(name: &str) -> bool {
    PSEUDO_TYPE_SET.contains(name)
}

/// Resolve `name` against a file's namespace and imports.
///
/// Pseudo-types come back unchanged; everything else comes back with
/// exactly one leading `\`. Aliases match the whole name only, so
/// `Baz\Inner` is namespace-prefixed even when `Baz` is imported.
///
/// Unlike plain prefixing, `namespace\Foo` is treated as PHP's relative
/// name operator and resolves to `Foo` inside the current namespace.
pub fn resolve_name(facts: &ScanFacts, name: &str) -> String {
    if is_pseudo_type(name) {
        return name.to_string();
    }

    let namespace = facts.namespace().unwrap_or_default();
    let qualified = if let Some(rest) = name.strip_prefix(NS_SEPARATOR) {
        rest.to_string()
    } else if let Some(rest) = relative_name(name) {
        join_name(namespace, rest)
    } else {
        match facts.alias(name) {
            Some(target) => target.to_string(),
            None => join_name(namespace, name),
        }
    };

    format!("{}{}", NS_SEPARATOR, strip_leading_separator(&qualified))
}

/// Resolve `name` and look it up in `registry`.
pub fn get_type(
    facts: &ScanFacts,
    registry: &dyn TypeRegistry,
    name: &str,
) -> Result<TypeHandle> {
    if is_pseudo_type(name) {
        return Err(ReflectionError::InvalidName(name.to_string()));
    }

    let resolved = resolve_name(facts, name);
    let qualified = strip_leading_separator(&resolved);
    trace!("[RESOLVE] {} -> {}", name, qualified);
    registry
        .lookup(qualified)
        .ok_or_else(|| ReflectionError::UnknownType(qualified.to_string()))
}

/// `namespace\Foo` → `Foo`, resolved against the current namespace.
fn relative_name(name: &str) -> Option<&str> {
    match split_first_segment(name) {
        (first, Some(rest)) if first.eq_ignore_ascii_case("namespace") => Some(rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::reflect::TypeIndex;
    use crate::scan::{TypeKind, scan_source};

    const HELLO_WORLD: &str = r#"<?php
namespace Hello\World;

use Other\World\Baz;
use Other\World\Nib as Fud;

class Foo {}
class Bar {}
"#;

    #[rstest]
    #[case::alias("Baz", "\\Other\\World\\Baz")]
    #[case::explicit_alias("Fud", "\\Other\\World\\Nib")]
    #[case::namespaced("Foo", "\\Hello\\World\\Foo")]
    #[case::multi_segment("Bat\\Wing", "\\Hello\\World\\Bat\\Wing")]
    #[case::fully_qualified("\\Other\\World\\Fud", "\\Other\\World\\Fud")]
    #[case::alias_is_whole_name_only("Baz\\Inner", "\\Hello\\World\\Baz\\Inner")]
    #[case::explicit_alias_is_whole_name_only("Fud\\X", "\\Hello\\World\\Fud\\X")]
    #[case::relative("namespace\\Sub\\Thing", "\\Hello\\World\\Sub\\Thing")]
    #[case::pseudo("string", "string")]
    #[case::pseudo_shadows_nothing("void", "void")]
    #[case::case_sensitive_pseudo("String", "\\Hello\\World\\String")]
    fn test_resolve_in_namespace(#[case] name: &str, #[case] expected: &str) {
        let facts = scan_source(HELLO_WORLD);
        assert_eq!(resolve_name(&facts, name), expected);
    }

    #[rstest]
    #[case::plain("Foo", "\\Foo")]
    #[case::qualified("A\\B", "\\A\\B")]
    #[case::leading("\\A\\B", "\\A\\B")]
    #[case::relative("namespace\\Foo", "\\Foo")]
    fn test_resolve_without_namespace(#[case] name: &str, #[case] expected: &str) {
        let facts = scan_source("<?php\nclass Foo {}\n");
        assert_eq!(resolve_name(&facts, name), expected);
    }

    #[test]
    fn test_pseudo_types() {
        for name in PSEUDO_TYPES {
            assert!(is_pseudo_type(name), "{name}");
        }
        assert!(!is_pseudo_type("Integer"));
        assert!(!is_pseudo_type("iterable"));
        assert!(!is_pseudo_type(""));
    }

    #[test]
    fn test_pseudo_type_bypasses_alias() {
        let facts = scan_source("<?php\nnamespace N;\nuse Vendor\\Types\\string;\n");
        assert_eq!(resolve_name(&facts, "string"), "string");
    }

    #[test]
    fn test_get_type() {
        let facts = scan_source(HELLO_WORLD);
        let mut index = TypeIndex::new();
        index.register(TypeHandle::new("Hello\\World\\Foo", TypeKind::Class));
        index.register(TypeHandle::new("Other\\World\\Nib", TypeKind::Interface));

        let foo = get_type(&facts, &index, "Foo").unwrap();
        assert_eq!(foo.name(), "Hello\\World\\Foo");
        let fud = get_type(&facts, &index, "Fud").unwrap();
        assert_eq!(fud.kind(), TypeKind::Interface);
    }

    #[test]
    fn test_get_type_errors() {
        let facts = scan_source(HELLO_WORLD);
        let index = TypeIndex::new();

        let err = get_type(&facts, &index, "string").unwrap_err();
        assert!(matches!(err, ReflectionError::InvalidName(name) if name == "string"));

        let err = get_type(&facts, &index, "Blah").unwrap_err();
        assert!(matches!(err, ReflectionError::UnknownType(name) if name == "Hello\\World\\Blah"));
    }
}
