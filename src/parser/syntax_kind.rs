//! Token kinds produced by the PHP lexer
//!
//! This enum covers everything the lexer can emit. The scanner only
//! looks at a handful of them; the rest exist so that every byte of a
//! source file lands in some token.

/// All token kinds in PHP source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DOC_COMMENT,

    // =========================================================================
    // TEMPLATE (text outside of <?php ... ?>)
    // =========================================================================
    INLINE_HTML,
    OPEN_TAG,           // <?php
    OPEN_TAG_WITH_ECHO, // <?=
    CLOSE_TAG,          // ?>

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,    // identifier (any word that is not a keyword)
    VARIABLE, // $name
    INTEGER,  // 42, 0x2A, 0b101
    DECIMAL,  // 3.14, 1e10
    STRING,   // 'single quoted'

    // =========================================================================
    // INTERPOLATED STRINGS
    // =========================================================================
    DOUBLE_QUOTE,             // "
    BACKTICK,                 // `
    START_HEREDOC,            // <<<EOT / <<<'EOT'
    END_HEREDOC,              // EOT
    ENCAPSED_AND_WHITESPACE,  // literal text inside an interpolated string
    CURLY_OPEN,               // { in "{$expr}"
    DOLLAR_OPEN_CURLY_BRACES, // ${ in "${expr}"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,           // {
    R_BRACE,           // }
    L_BRACKET,         // [
    R_BRACKET,         // ]
    L_PAREN,           // (
    R_PAREN,           // )
    SEMICOLON,         // ;
    COMMA,             // ,
    NS_SEPARATOR,      // \
    COLON,             // :
    COLON_COLON,       // ::
    ARROW,             // ->
    NULLSAFE_ARROW,    // ?->
    FAT_ARROW,         // =>
    DOT,               // .
    ELLIPSIS,          // ...
    EQ,                // =
    EQ_EQ,             // ==
    EQ_EQ_EQ,          // ===
    BANG_EQ,           // != or <>
    BANG_EQ_EQ,        // !==
    LT,                // <
    GT,                // >
    LT_EQ,             // <=
    GT_EQ,             // >=
    SPACESHIP,         // <=>
    LT_LT,             // <<
    GT_GT,             // >>
    PLUS,              // +
    PLUS_PLUS,         // ++
    MINUS,             // -
    MINUS_MINUS,       // --
    STAR,              // *
    STAR_STAR,         // **
    SLASH,             // /
    PERCENT,           // %
    CARET,             // ^
    TILDE,             // ~
    BANG,              // !
    QUESTION,          // ?
    QUESTION_QUESTION, // ??
    AMP,               // &
    AMP_AMP,           // &&
    PIPE,              // |
    PIPE_PIPE,         // ||
    AT,                // @
    DOLLAR,            // $
    ASSIGN_OP,         // +=, -=, .=, ??=, ...
    ATTRIBUTE_START,   // #[

    // =========================================================================
    // KEYWORDS (case-insensitive in source)
    // =========================================================================
    ABSTRACT_KW,
    AS_KW,
    CLASS_KW,
    CONST_KW,
    ENUM_KW,
    EXTENDS_KW,
    FINAL_KW,
    FN_KW,
    FUNCTION_KW,
    HALT_COMPILER_KW,
    IMPLEMENTS_KW,
    INSTANCEOF_KW,
    INTERFACE_KW,
    NAMESPACE_KW,
    NEW_KW,
    READONLY_KW,
    STATIC_KW,
    TRAIT_KW,
    USE_KW,

    // Special
    ERROR,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::DOC_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ABSTRACT_KW as u16) && (self as u16) <= (Self::USE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::ATTRIBUTE_START as u16)
    }

    /// Identifiers and keywords: anything that can spell a name segment.
    ///
    /// Reserved words are legal inside namespace names (`App\Enum\Status`),
    /// so name accumulation accepts both.
    pub fn is_name_like(self) -> bool {
        self == Self::IDENT || self.is_keyword()
    }

    /// Tokens that open a brace-delimited block, including the
    /// interpolation forms inside strings.
    pub fn opens_brace(self) -> bool {
        matches!(
            self,
            Self::L_BRACE | Self::CURLY_OPEN | Self::DOLLAR_OPEN_CURLY_BRACES
        )
    }

    /// Keyword that starts a top-level type declaration.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            Self::CLASS_KW | Self::INTERFACE_KW | Self::TRAIT_KW | Self::ENUM_KW
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_range() {
        assert!(SyntaxKind::ABSTRACT_KW.is_keyword());
        assert!(SyntaxKind::USE_KW.is_keyword());
        assert!(SyntaxKind::CLASS_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(!SyntaxKind::ERROR.is_keyword());
    }

    #[test]
    fn test_punct_range() {
        assert!(SyntaxKind::L_BRACE.is_punct());
        assert!(SyntaxKind::NS_SEPARATOR.is_punct());
        assert!(!SyntaxKind::DOUBLE_QUOTE.is_punct());
        assert!(!SyntaxKind::ABSTRACT_KW.is_punct());
    }

    #[test]
    fn test_brace_openers() {
        assert!(SyntaxKind::L_BRACE.opens_brace());
        assert!(SyntaxKind::CURLY_OPEN.opens_brace());
        assert!(SyntaxKind::DOLLAR_OPEN_CURLY_BRACES.opens_brace());
        assert!(!SyntaxKind::R_BRACE.opens_brace());
    }
}
