// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Era lexical analysis.
//!
//! Each token consists of:
//! - A [`TokenKind`] naming its lexical category
//! - The exact source text it covers (empty for [`TokenKind::NewLine`])
//! - A [`Position`] locating it in the source
//!
//! Tokens are immutable once created and compare structurally over all
//! three fields.

use std::fmt;

use ecow::EcoString;

use super::Position;

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name: `counter`, `_tmp`, `R5x`
    Identifier,
    /// A punctuation terminal: `;`, `,`, `(`, `[`
    Delimiter,
    /// An operator terminal: `+`, `:=`, `<=>`, `>>=`
    Operator,
    /// A reserved word: `routine`, `asm`, `end`
    Keyword,
    /// An integer literal, optionally signed: `42`, `-7`
    Number,
    /// A machine register: `R0` through `R31`
    Register,
    /// A `//` comment; the text is the comment body without the marker
    LineComment,
    /// An end-of-line marker, positioned at the end of the line it closes
    NewLine,
}

impl TokenKind {
    /// Returns `true` for the kinds the token stream skips by default.
    ///
    /// Comments and newlines carry no grammar significance in Era; the
    /// stream filters them out unless a caller opts back in.
    #[must_use]
    pub const fn is_skipped_by_default(self) -> bool {
        matches!(self, Self::LineComment | Self::NewLine)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "Identifier",
            Self::Delimiter => "Delimiter",
            Self::Operator => "Operator",
            Self::Keyword => "Keyword",
            Self::Number => "Number",
            Self::Register => "Register",
            Self::LineComment => "LineComment",
            Self::NewLine => "NewLine",
        };
        write!(f, "{name}")
    }
}

/// A token with its source text and location.
///
/// # Examples
///
/// ```
/// use era_core::source_analysis::{Position, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Keyword, "end", Position::on_line(0, 4, 3));
/// assert!(token.is_keyword("end"));
/// assert_eq!(token.to_debug_string(), "{Keyword: end}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: EcoString,
    position: Position,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<EcoString>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Returns the lexical category.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the exact source text of the token.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the source range the token covers.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns `true` if this is the keyword `expected`.
    #[must_use]
    pub fn is_keyword(&self, expected: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == expected
    }

    /// Returns `true` if this is the delimiter `expected`.
    #[must_use]
    pub fn is_delimiter(&self, expected: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.text == expected
    }

    /// Returns `true` if this is the operator `expected`.
    #[must_use]
    pub fn is_operator(&self, expected: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == expected
    }

    /// Returns `true` if this is any identifier.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Returns `true` if this is any number literal.
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    /// Returns `true` if this is any register.
    #[must_use]
    pub fn is_register(&self) -> bool {
        self.kind == TokenKind::Register
    }

    /// Renders the token in the fixture dump format: `{Kind: text}`.
    #[must_use]
    pub fn to_debug_string(&self) -> String {
        format!("{{{}: {}}}", self.kind, self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Position::on_line(0, 0, text.len()))
    }

    #[test]
    fn category_predicates() {
        assert!(token(TokenKind::Keyword, "end").is_keyword("end"));
        assert!(!token(TokenKind::Keyword, "end").is_keyword("do"));
        assert!(!token(TokenKind::Identifier, "end").is_keyword("end"));

        assert!(token(TokenKind::Delimiter, ";").is_delimiter(";"));
        assert!(token(TokenKind::Operator, ":=").is_operator(":="));
        assert!(token(TokenKind::Identifier, "x").is_identifier());
        assert!(token(TokenKind::Number, "42").is_number());
        assert!(token(TokenKind::Register, "R3").is_register());
    }

    #[test]
    fn equality_is_structural() {
        let a = Token::new(TokenKind::Number, "1", Position::on_line(0, 0, 1));
        let b = Token::new(TokenKind::Number, "1", Position::on_line(0, 0, 1));
        let c = Token::new(TokenKind::Number, "1", Position::on_line(1, 0, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn debug_dump_format() {
        assert_eq!(
            token(TokenKind::Operator, "<=>").to_debug_string(),
            "{Operator: <=>}"
        );
        assert_eq!(
            token(TokenKind::NewLine, "").to_debug_string(),
            "{NewLine: }"
        );
    }

    #[test]
    fn default_skip_set() {
        assert!(TokenKind::LineComment.is_skipped_by_default());
        assert!(TokenKind::NewLine.is_skipped_by_default());
        assert!(!TokenKind::Identifier.is_skipped_by_default());
        assert!(!TokenKind::Keyword.is_skipped_by_default());
    }

    #[test]
    fn display_is_source_text() {
        assert_eq!(token(TokenKind::Keyword, "loop").to_string(), "loop");
    }
}
