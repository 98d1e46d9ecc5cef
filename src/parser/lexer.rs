//! Logos-based lexer for PHP
//!
//! Code between `<?php` and `?>` is tokenized by the logos-generated
//! [`LogosToken`] automaton. Everything logos cannot express as a regular
//! language (inline HTML, interpolated strings, heredoc bodies) is handled by
//! a small mode stack in [`Lexer`], which hands control back to logos for
//! the embedded code of `{$expr}` and `${expr}` interpolations.

use logos::Logos;
use text_size::{TextRange, TextSize};

use super::keywords::keyword_kind;
use super::syntax_kind::SyntaxKind;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
    /// 1-based line on which the token starts
    pub line: u32,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Lexer state. The bottom of the stack is always the template (HTML) or
/// code mode the lexer was created in.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Html,
    Code,
    /// Code embedded in a string via `{$` or `${`; `depth` counts open braces.
    Interpolation { depth: u32 },
    DoubleQuoted,
    Backtick,
    Heredoc { label: String },
    Nowdoc { label: String },
    /// Everything after `__halt_compiler();` is raw data.
    Halted,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    modes: Vec<Mode>,
    halt_pending: bool,
}

impl<'a> Lexer<'a> {
    /// Lex a complete PHP file, which starts out as inline HTML.
    pub fn new(input: &'a str) -> Self {
        Self::with_mode(input, Mode::Html)
    }

    /// Lex a code fragment with no leading `<?php`.
    pub fn code(input: &'a str) -> Self {
        Self::with_mode(input, Mode::Code)
    }

    fn with_mode(input: &'a str, mode: Mode) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            modes: vec![mode],
            halt_pending: false,
        }
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.input.as_bytes()[self.pos - 1] == b'\n'
    }

    fn transition(&mut self, kind: SyntaxKind, text: &str) {
        match kind {
            SyntaxKind::OPEN_TAG | SyntaxKind::OPEN_TAG_WITH_ECHO => self.modes.push(Mode::Code),
            SyntaxKind::CLOSE_TAG => {
                self.modes.pop();
                if self.halt_pending {
                    self.modes.push(Mode::Halted);
                }
            }
            SyntaxKind::DOUBLE_QUOTE => self.toggle(Mode::DoubleQuoted),
            SyntaxKind::BACKTICK => self.toggle(Mode::Backtick),
            SyntaxKind::START_HEREDOC => self.modes.push(heredoc_mode(text)),
            SyntaxKind::END_HEREDOC => {
                self.modes.pop();
            }
            SyntaxKind::CURLY_OPEN | SyntaxKind::DOLLAR_OPEN_CURLY_BRACES => {
                self.modes.push(Mode::Interpolation { depth: 1 })
            }
            SyntaxKind::L_BRACE => {
                if let Some(Mode::Interpolation { depth }) = self.modes.last_mut() {
                    *depth += 1;
                }
            }
            SyntaxKind::R_BRACE => {
                let closed = match self.modes.last_mut() {
                    Some(Mode::Interpolation { depth }) => {
                        *depth -= 1;
                        *depth == 0
                    }
                    _ => false,
                };
                if closed {
                    self.modes.pop();
                }
            }
            SyntaxKind::HALT_COMPILER_KW => self.halt_pending = true,
            SyntaxKind::SEMICOLON if self.halt_pending => self.modes.push(Mode::Halted),
            _ => {}
        }
    }

    /// A quote either opens a string (from code) or closes the one we are in.
    fn toggle(&mut self, string_mode: Mode) {
        if self.modes.last() == Some(&string_mode) {
            self.modes.pop();
        } else {
            self.modes.push(string_mode);
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        // Offsets are u32; input past 4 GiB is not tokenized
        let offset = token_offset(self.pos)?;
        let input = self.input;
        let rest = &input[self.pos..];
        let at_line_start = self.at_line_start();
        let (kind, len) = match self.modes.last() {
            None | Some(Mode::Html) => lex_inline_html(rest),
            Some(Mode::Code | Mode::Interpolation { .. }) => lex_code(rest),
            Some(Mode::DoubleQuoted) => lex_template(rest, b'"'),
            Some(Mode::Backtick) => lex_template(rest, b'`'),
            Some(Mode::Heredoc { label }) => lex_heredoc(rest, label, true, at_line_start),
            Some(Mode::Nowdoc { label }) => lex_heredoc(rest, label, false, at_line_start),
            Some(Mode::Halted) => (SyntaxKind::INLINE_HTML, rest.len()),
        };

        let text = &rest[..len];
        let token = Token {
            kind,
            text,
            offset,
            line: self.line,
        };

        self.pos += len;
        self.line += text.bytes().filter(|&b| b == b'\n').count() as u32;
        self.transition(kind, text);

        Some(token)
    }
}

fn token_offset(pos: usize) -> Option<TextSize> {
    TextSize::try_from(pos).ok()
}

/// Tokenize an entire PHP file into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

// ============================================================================
// MODE HANDLERS
// ============================================================================

fn lex_inline_html(rest: &str) -> (SyntaxKind, usize) {
    match find_open_tag(rest) {
        Some((0, kind, len)) => (kind, len),
        Some((start, _, _)) => (SyntaxKind::INLINE_HTML, start),
        None => (SyntaxKind::INLINE_HTML, rest.len()),
    }
}

/// Find the next `<?php` or `<?=`. Returns (start, kind, tag length).
///
/// `<?php` must be followed by whitespace or end of input, and the tag
/// swallows one newline (or space) the way PHP does. Bare `<?` short tags
/// are left as HTML.
fn find_open_tag(rest: &str) -> Option<(usize, SyntaxKind, usize)> {
    let bytes = rest.as_bytes();
    let mut from = 0;
    while let Some(i) = rest[from..].find("<?") {
        let start = from + i;
        let after = &bytes[start + 2..];
        if after.first() == Some(&b'=') {
            return Some((start, SyntaxKind::OPEN_TAG_WITH_ECHO, 3));
        }
        if after.len() >= 3 && after[..3].eq_ignore_ascii_case(b"php") {
            let tail = &after[3..];
            let trailing = match tail {
                [] => Some(0),
                [b'\r', b'\n', ..] => Some(2),
                [b'\n' | b'\r' | b' ' | b'\t', ..] => Some(1),
                _ => None,
            };
            if let Some(trailing) = trailing {
                return Some((start, SyntaxKind::OPEN_TAG, 5 + trailing));
            }
        }
        from = start + 2;
    }
    None
}

fn lex_code(rest: &str) -> (SyntaxKind, usize) {
    let mut lexer = LogosToken::lexer(rest);
    let kind = match lexer.next() {
        Some(Ok(token)) => token.classify(lexer.slice()),
        Some(Err(())) | None => SyntaxKind::ERROR,
    };

    let mut len = lexer.span().end.max(1).min(rest.len());
    while !rest.is_char_boundary(len) {
        len += 1;
    }

    // A line comment stops right before a closing tag.
    if kind == SyntaxKind::LINE_COMMENT {
        if let Some(close) = rest[..len].find("?>") {
            len = close;
        }
    }

    (kind, len)
}

/// Double-quoted and backtick strings.
fn lex_template(rest: &str, quote: u8) -> (SyntaxKind, usize) {
    if rest.as_bytes()[0] == quote {
        let kind = if quote == b'"' {
            SyntaxKind::DOUBLE_QUOTE
        } else {
            SyntaxKind::BACKTICK
        };
        return (kind, 1);
    }
    if let Some(token) = lex_interpolation_start(rest) {
        return token;
    }
    (
        SyntaxKind::ENCAPSED_AND_WHITESPACE,
        scan_encapsed(rest, Some(quote)),
    )
}

fn lex_heredoc(
    rest: &str,
    label: &str,
    interpolate: bool,
    at_line_start: bool,
) -> (SyntaxKind, usize) {
    if at_line_start {
        if let Some(len) = closing_marker_len(rest, label) {
            return (SyntaxKind::END_HEREDOC, len);
        }
    }
    if interpolate {
        if let Some(token) = lex_interpolation_start(rest) {
            return token;
        }
    }

    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                i += 1;
                if closing_marker_len(&rest[i..], label).is_some() {
                    return (SyntaxKind::ENCAPSED_AND_WHITESPACE, i);
                }
                continue;
            }
            b'\\' if interpolate && bytes.get(i + 1) != Some(&b'\n') => i += 2,
            _ if interpolate && i > 0 && starts_interpolation(&bytes[i..]) => {
                return (SyntaxKind::ENCAPSED_AND_WHITESPACE, i);
            }
            _ => i += 1,
        }
    }
    (SyntaxKind::ENCAPSED_AND_WHITESPACE, rest.len())
}

/// `{$`, `${` or a simple `$name` at the start of string content.
fn lex_interpolation_start(rest: &str) -> Option<(SyntaxKind, usize)> {
    let bytes = rest.as_bytes();
    match bytes {
        [b'{', b'$', ..] => Some((SyntaxKind::CURLY_OPEN, 1)),
        [b'$', b'{', ..] => Some((SyntaxKind::DOLLAR_OPEN_CURLY_BRACES, 2)),
        [b'$', next, ..] if is_ident_start(*next) => {
            Some((SyntaxKind::VARIABLE, 1 + ident_len(&bytes[1..])))
        }
        _ => None,
    }
}

fn starts_interpolation(bytes: &[u8]) -> bool {
    matches!(bytes, [b'{', b'$', ..] | [b'$', b'{', ..])
        || matches!(bytes, [b'$', next, ..] if is_ident_start(*next))
}

/// Length of literal string content up to the next quote or interpolation.
fn scan_encapsed(rest: &str, quote: Option<u8>) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if i > 0 && (Some(b) == quote || starts_interpolation(&bytes[i..])) {
            return i;
        }
        i += 1;
    }
    rest.len()
}

/// Length of a heredoc closing marker (`  EOT`) at the start of `line`.
fn closing_marker_len(line: &str, label: &str) -> Option<usize> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let indent = line.len() - trimmed.len();
    let after = trimmed.strip_prefix(label)?;
    match after.as_bytes().first() {
        Some(&b) if is_ident_byte(b) => None,
        _ => Some(indent + label.len()),
    }
}

fn heredoc_mode(start: &str) -> Mode {
    let marker = start
        .trim_start_matches("<<<")
        .trim_start_matches([' ', '\t'])
        .trim_end_matches(['\r', '\n']);
    if let Some(label) = marker.strip_prefix('\'') {
        Mode::Nowdoc {
            label: label.trim_end_matches('\'').to_string(),
        }
    } else {
        Mode::Heredoc {
            label: marker.trim_matches('"').to_string(),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn ident_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_ident_byte(b)).count()
}

// ============================================================================
// LOGOS AUTOMATON (code mode)
// ============================================================================

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    #[regex(r"#([^\[\n][^\n]*)?")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // TAGS AND STRING DELIMITERS
    // =========================================================================
    #[regex(r"\?>(\r?\n)?")]
    CloseTag,

    #[token("\"")]
    DoubleQuote,

    #[token("`")]
    Backtick,

    #[regex(r#"<<<[ \t]*[a-zA-Z_][a-zA-Z0-9_]*\r?\n"#)]
    #[regex(r#"<<<[ \t]*"[a-zA-Z_][a-zA-Z0-9_]*"\r?\n"#)]
    #[regex(r#"<<<[ \t]*'[a-zA-Z_][a-zA-Z0-9_]*'\r?\n"#)]
    StartHeredoc,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*")]
    Ident,

    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*")]
    Variable,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    Integer,

    #[regex(r"[0-9]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*\.([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Decimal,

    #[regex(r"'([^'\\]|\\(.|\n))*'")]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("#[")]
    AttributeStart,

    #[token("::")]
    ColonColon,

    #[token("?->")]
    NullsafeArrow,

    #[token("->")]
    Arrow,

    #[token("=>")]
    FatArrow,

    #[token("...")]
    Ellipsis,

    #[token("===")]
    EqEqEq,

    #[token("!==")]
    BangEqEq,

    #[token("==")]
    EqEq,

    #[token("!=")]
    #[token("<>")]
    BangEq,

    #[token("<=>")]
    Spaceship,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("<<")]
    LtLt,

    #[token(">>")]
    GtGt,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("**")]
    StarStar,

    #[token("??")]
    QuestionQuestion,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token(".=")]
    #[token("%=")]
    #[token("**=")]
    #[token("??=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    AssignOp,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("\\")]
    NsSeparator,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("@")]
    At,
    #[token("$")]
    Dollar,
}

impl LogosToken {
    /// Map to a SyntaxKind, using the matched text where the kind depends on it.
    fn classify(self, text: &str) -> SyntaxKind {
        match self {
            Self::Ident => keyword_kind(text).unwrap_or(SyntaxKind::IDENT),
            Self::BlockComment if text.len() > 4 && text.starts_with("/**") => {
                SyntaxKind::DOC_COMMENT
            }
            other => other.into(),
        }
    }
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Tags and string delimiters
            CloseTag => SyntaxKind::CLOSE_TAG,
            DoubleQuote => SyntaxKind::DOUBLE_QUOTE,
            Backtick => SyntaxKind::BACKTICK,
            StartHeredoc => SyntaxKind::START_HEREDOC,

            // Literals
            Ident => SyntaxKind::IDENT,
            Variable => SyntaxKind::VARIABLE,
            Integer => SyntaxKind::INTEGER,
            Decimal => SyntaxKind::DECIMAL,
            String => SyntaxKind::STRING,

            // Multi-char punctuation
            AttributeStart => SyntaxKind::ATTRIBUTE_START,
            ColonColon => SyntaxKind::COLON_COLON,
            NullsafeArrow => SyntaxKind::NULLSAFE_ARROW,
            Arrow => SyntaxKind::ARROW,
            FatArrow => SyntaxKind::FAT_ARROW,
            Ellipsis => SyntaxKind::ELLIPSIS,
            EqEqEq => SyntaxKind::EQ_EQ_EQ,
            BangEqEq => SyntaxKind::BANG_EQ_EQ,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            Spaceship => SyntaxKind::SPACESHIP,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            LtLt => SyntaxKind::LT_LT,
            GtGt => SyntaxKind::GT_GT,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            StarStar => SyntaxKind::STAR_STAR,
            QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            AssignOp => SyntaxKind::ASSIGN_OP,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            NsSeparator => SyntaxKind::NS_SEPARATOR,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Caret => SyntaxKind::CARET,
            Tilde => SyntaxKind::TILDE,
            Bang => SyntaxKind::BANG,
            Question => SyntaxKind::QUESTION,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            At => SyntaxKind::AT,
            Dollar => SyntaxKind::DOLLAR,
        }
    }
}
