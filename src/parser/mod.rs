//! PHP tokenizer
//!
//! The scanner never needs a syntax tree, only a flat token stream, so this
//! layer stops at lexing:
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos + mode stack) → Tokens with SyntaxKind
//!     ↓
//! Scanner → ScanFacts
//! ```

pub mod keywords;
mod lexer;
mod syntax_kind;

pub use lexer::{Lexer, Token, tokenize};
pub use syntax_kind::SyntaxKind;
