//! Helpers for backslash-separated names.

use super::constants::{NS_SEPARATOR, NS_SEPARATOR_STR};

/// Remove a single leading `\`, if present.
pub fn strip_leading_separator(name: &str) -> &str {
    name.strip_prefix(NS_SEPARATOR).unwrap_or(name)
}

/// The segment after the last `\` (the whole name when there is none).
///
/// `Other\World\Baz` → `Baz`, `Baz` → `Baz`.
pub fn last_segment(name: &str) -> &str {
    match name.rfind(NS_SEPARATOR) {
        Some(pos) => &name[pos + NS_SEPARATOR.len_utf8()..],
        None => name,
    }
}

/// Split off the first segment: `Bat\Wing\Tip` → (`Bat`, Some(`Wing\Tip`)).
pub fn split_first_segment(name: &str) -> (&str, Option<&str>) {
    match name.split_once(NS_SEPARATOR_STR) {
        Some((first, rest)) => (first, Some(rest)),
        None => (name, None),
    }
}

/// Join a namespace and a name. An empty namespace yields the name itself.
pub fn join_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{NS_SEPARATOR}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment(r"Other\World\Baz"), "Baz");
        assert_eq!(last_segment("Baz"), "Baz");
        assert_eq!(last_segment(r"Trailing\"), "");
    }

    #[test]
    fn test_split_first_segment() {
        assert_eq!(split_first_segment(r"Bat\Wing\Tip"), ("Bat", Some(r"Wing\Tip")));
        assert_eq!(split_first_segment("Bat"), ("Bat", None));
    }

    #[test]
    fn test_join_name() {
        assert_eq!(join_name(r"Hello\World", "Foo"), r"Hello\World\Foo");
        assert_eq!(join_name("", "Foo"), "Foo");
    }

    #[test]
    fn test_strip_leading_separator_removes_only_one() {
        assert_eq!(strip_leading_separator(r"\Foo\Bar"), r"Foo\Bar");
        assert_eq!(strip_leading_separator(r"\\Foo"), r"\Foo");
        assert_eq!(strip_leading_separator("Foo"), "Foo");
    }
}
