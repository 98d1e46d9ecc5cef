//! Foundation types for filereflect.
//!
//! This module provides the primitives shared by every other layer:
//! - [`Timestamp`] - Modification times as whole seconds since the UNIX epoch
//! - Name helpers for backslash-separated PHP names
//! - Domain constants (separator, cache entry extension, snapshot version)
//!
//! This module has NO dependencies on other filereflect modules.

pub mod constants;
mod names;
mod timestamp;

pub use names::{join_name, last_segment, split_first_segment, strip_leading_separator};
pub use timestamp::{Timestamp, from_system_time, modified_timestamp, now, to_system_time};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
