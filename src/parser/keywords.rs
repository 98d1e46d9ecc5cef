//! Keyword table
//!
//! PHP keywords are case-insensitive (`CLASS`, `Class` and `class` are the
//! same token), so the lexer emits every word as an identifier and this
//! table promotes the reserved ones.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::SyntaxKind;

/// Every keyword the lexer distinguishes, in lowercase.
pub const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("abstract", SyntaxKind::ABSTRACT_KW),
    ("as", SyntaxKind::AS_KW),
    ("class", SyntaxKind::CLASS_KW),
    ("const", SyntaxKind::CONST_KW),
    ("enum", SyntaxKind::ENUM_KW),
    ("extends", SyntaxKind::EXTENDS_KW),
    ("final", SyntaxKind::FINAL_KW),
    ("fn", SyntaxKind::FN_KW),
    ("function", SyntaxKind::FUNCTION_KW),
    ("__halt_compiler", SyntaxKind::HALT_COMPILER_KW),
    ("implements", SyntaxKind::IMPLEMENTS_KW),
    ("instanceof", SyntaxKind::INSTANCEOF_KW),
    ("interface", SyntaxKind::INTERFACE_KW),
    ("namespace", SyntaxKind::NAMESPACE_KW),
    ("new", SyntaxKind::NEW_KW),
    ("readonly", SyntaxKind::READONLY_KW),
    ("static", SyntaxKind::STATIC_KW),
    ("trait", SyntaxKind::TRAIT_KW),
    ("use", SyntaxKind::USE_KW),
];

static KEYWORD_MAP: LazyLock<FxHashMap<&'static str, SyntaxKind>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

/// Look up the keyword kind for a word, ignoring ASCII case.
pub fn keyword_kind(word: &str) -> Option<SyntaxKind> {
    if word.bytes().any(|b| b.is_ascii_uppercase()) {
        KEYWORD_MAP.get(word.to_ascii_lowercase().as_str()).copied()
    } else {
        KEYWORD_MAP.get(word).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_is_a_keyword_kind() {
        for (word, kind) in KEYWORDS {
            assert!(kind.is_keyword(), "{word} maps to non-keyword {kind:?}");
            assert_eq!(keyword_kind(word), Some(*kind));
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(keyword_kind("CLASS"), Some(SyntaxKind::CLASS_KW));
        assert_eq!(keyword_kind("NameSpace"), Some(SyntaxKind::NAMESPACE_KW));
        assert_eq!(keyword_kind("__HALT_COMPILER"), Some(SyntaxKind::HALT_COMPILER_KW));
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(keyword_kind("Foo"), None);
        assert_eq!(keyword_kind("classes"), None);
        assert_eq!(keyword_kind(""), None);
    }
}
