//! Domain constants.

/// Separator between namespace segments (`Hello\World\Foo`).
pub const NS_SEPARATOR: char = '\\';

/// Same separator, as a string slice for `find`/`split` calls.
pub const NS_SEPARATOR_STR: &str = "\\";

/// Extension of the entry files written by [`crate::cache::FileCache`].
pub const CACHE_FILE_EXTENSION: &str = "json";

/// Format version stamped into every exported [`crate::scan::Snapshot`].
///
/// Bump this whenever the layout of `Snapshot` changes; cached entries
/// carrying a different version are recomputed.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Built-in pseudo-type names that are never namespace-qualified.
///
/// Closed and case-sensitive.
pub const PSEUDO_TYPES: &[&str] = &[
    "array", "bool", "boolean", "callback", "double", "float", "int", "integer", "mixed", "number",
    "object", "string", "void",
];
