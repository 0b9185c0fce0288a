// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Era source code.
//!
//! The lexer is hand-written and resolves tokens by greedy longest match:
//! it accumulates a candidate one character at a time and keeps consuming
//! while the candidate plus lookahead could still grow into a longer
//! identifier, number, or terminal. Only when extension stops does the
//! candidate get classified — which is why `form` is one identifier and
//! never `for` + `m`, and why `R5x` is an identifier and not the register
//! `R5`.
//!
//! Tokenization is eager: the whole buffer is lexed into a materialized
//! token sequence before parsing begins. Tokens never span lines; a line
//! break always either terminates cleanly (emitting a [`TokenKind::NewLine`]
//! marker) or is a fatal error when a token is still being read.
//!
//! # Example
//!
//! ```
//! use era_core::source_analysis::{SourceBuffer, tokenize};
//!
//! let mut source = SourceBuffer::new("code stop end\n");
//! let tokens = tokenize(&mut source).unwrap();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text().to_string()).collect();
//! assert_eq!(texts, ["code", "stop", "end", ""]);
//! ```

use ecow::EcoString;

use crate::error::TokenizationError;

use super::terminals::{self, LINE_COMMENT};
use super::{Position, SourceBuffer, Token, TokenKind};

/// A lexer that tokenizes Era source code.
///
/// Tracks the current line and column incrementally as characters are
/// consumed; every emitted token's position is computed by subtracting the
/// token's length from that cursor.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src mut SourceBuffer,
    /// Zero-based line of the next unread character.
    line: usize,
    /// Zero-based column of the next unread character.
    symbol: usize,
    /// Length of the most recently completed line, for NewLine positions.
    prev_line_length: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer reading from the start of the buffer.
    #[must_use]
    pub fn new(source: &'src mut SourceBuffer) -> Self {
        source.reset();
        Self {
            source,
            line: 0,
            symbol: 0,
            prev_line_length: 0,
        }
    }

    /// Lexes the entire buffer into a token sequence.
    ///
    /// # Errors
    ///
    /// Fails on the first unresolvable input; see
    /// [`TokenizationErrorKind`](crate::error::TokenizationErrorKind).
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizationError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tracing::trace!(kind = %token.kind(), text = token.text(), "lexed token");
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Reads one token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, TokenizationError> {
        let mut sequence = String::new();

        while !self.source.at_end() {
            let next = self.read_symbol();

            if next == '\n' {
                if !sequence.is_empty() {
                    // Tokens cannot span lines. Unreachable from resolve-
                    // before-newline scanning, but the invariant stays
                    // enforced here rather than assumed.
                    return Err(TokenizationError::unexpected_end_of_line(
                        sequence,
                        self.newline_position(),
                    ));
                }
                return Ok(Some(Token::new(
                    TokenKind::NewLine,
                    "",
                    self.newline_position(),
                )));
            }

            if next == ' ' || next == '\t' {
                continue;
            }

            sequence.push(next);

            if sequence == LINE_COMMENT {
                let text = self.read_remaining_line();
                return Ok(Some(self.make_token(TokenKind::LineComment, text)));
            }

            // Greedy extension: keep consuming while the candidate plus
            // lookahead could still become a longer identifier, number,
            // terminal, or the comment opener.
            if let Some(lookahead) = self.source.peek() {
                let mut extended = sequence.clone();
                extended.push(lookahead);

                if terminals::is_identifier(&extended)
                    || terminals::is_number(&extended)
                    || terminals::is_terminal_prefix(&extended)
                {
                    continue;
                }
            }

            // Extension stopped: the candidate must resolve exactly.
            let kind = match Self::classify(&sequence) {
                Some(kind) => kind,
                None if self.source.at_end() => {
                    return Err(TokenizationError::failed(
                        sequence.clone(),
                        self.pending_position(&sequence),
                    ));
                }
                None => {
                    return Err(TokenizationError::unknown_symbol(
                        sequence.clone(),
                        self.pending_position(&sequence),
                    ));
                }
            };

            return Ok(Some(self.make_token(kind, sequence)));
        }

        if !sequence.is_empty() {
            return Err(TokenizationError::failed(
                sequence.clone(),
                self.pending_position(&sequence),
            ));
        }

        Ok(None)
    }

    /// Classifies fully accumulated text, registers before identifiers so
    /// `R5` resolves as a register while `R5x` already extended past it.
    fn classify(text: &str) -> Option<TokenKind> {
        if terminals::is_delimiter(text) {
            Some(TokenKind::Delimiter)
        } else if terminals::is_operator(text) {
            Some(TokenKind::Operator)
        } else if terminals::is_keyword(text) {
            Some(TokenKind::Keyword)
        } else if terminals::is_register(text) {
            Some(TokenKind::Register)
        } else if terminals::is_identifier(text) {
            Some(TokenKind::Identifier)
        } else if terminals::is_number(text) {
            Some(TokenKind::Number)
        } else {
            None
        }
    }

    /// Consumes one character, updating the line/column cursor.
    fn read_symbol(&mut self) -> char {
        let next = self.source.pop().expect("read_symbol called at end of input");
        if next == '\n' {
            self.prev_line_length = self.symbol;
            self.line += 1;
            self.symbol = 0;
        } else {
            self.symbol += 1;
        }
        next
    }

    /// Consumes up to, but not including, the next newline.
    fn read_remaining_line(&mut self) -> String {
        let mut text = String::new();
        while !self.source.at_end() && self.source.peek() != Some('\n') {
            text.push(self.read_symbol());
        }
        text
    }

    /// Position of a just-completed token: the cursor minus the text length.
    fn make_token(&self, kind: TokenKind, text: impl Into<EcoString>) -> Token {
        let text = text.into();
        let start = self.symbol - text.chars().count();
        Token::new(kind, text.clone(), Position::on_line(self.line, start, text.chars().count()))
    }

    /// Position of a NewLine token: a one-column span sitting on the
    /// newline's own column at the end of the line it closed.
    fn newline_position(&self) -> Position {
        Position::on_line(self.line - 1, self.prev_line_length, 1)
    }

    /// Position of half-read text for error reporting.
    fn pending_position(&self, pending: &str) -> Position {
        let len = pending.chars().count();
        Position::on_line(self.line, self.symbol.saturating_sub(len), len)
    }
}

/// Convenience function to lex a buffer into a token sequence.
///
/// # Errors
///
/// Propagates the first [`TokenizationError`].
pub fn tokenize(source: &mut SourceBuffer) -> Result<Vec<Token>, TokenizationError> {
    Lexer::new(source).tokenize()
}

/// Renders a token sequence in the fixture dump format, one `{Kind: text}`
/// entry per line.
#[must_use]
pub fn dump_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_debug_string)
        .collect::<Vec<_>>()
        .join("\n")
}
