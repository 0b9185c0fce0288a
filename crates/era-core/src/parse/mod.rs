// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Era source code.
//!
//! The parser walks the materialized token sequence through a
//! [`TokenStream`], backtracking freely: every "try one of N" point
//! fixates the cursor, attempts an alternative, and rolls back on a
//! non-match. Lookahead is unbounded and nothing is ever re-lexed.
//!
//! # Rule outcomes
//!
//! Every grammar rule returns [`Parsed`], which distinguishes the three
//! outcomes statically:
//!
//! - `Ok(Some(node))` — the rule matched and consumed its input
//! - `Ok(None)` — the rule does not apply here; the caller backtracks and
//!   tries the next alternative
//! - `Err(error)` — the rule *committed* (consumed its defining keyword or
//!   token) and then hit a mismatch; this is fatal and stops all
//!   backtracking
//!
//! The commit policy is the error-policy invariant of the grammar: once a
//! rule has seen its defining terminal, every subsequent problem must be
//! `Err`, never `Ok(None)`.
//!
//! # Example
//!
//! ```
//! use era_core::parse::parse;
//! use era_core::source_analysis::{SourceBuffer, tokenize};
//!
//! let mut source = SourceBuffer::new("data FOO 1, 2, 3 end\n");
//! let tokens = tokenize(&mut source).unwrap();
//! let root = parse(tokens).unwrap();
//! assert_eq!(root.children().len(), 1);
//! ```

use crate::ast::{AstNode, NodeKind};
use crate::error::SyntaxError;
use crate::source_analysis::{Point, Position, Token, TokenStream, keyword};

mod declarations;
mod expressions;
mod statements;

#[cfg(test)]
mod property_tests;

/// The outcome of one grammar rule: matched, no match, or fatal error.
pub type Parsed = Result<Option<AstNode>, SyntaxError>;

/// A grammar alternative, as tried by [`Parser::try_variants`].
type Variant = fn(&mut Parser) -> Parsed;

/// Parses a token sequence into the root `Program` node.
///
/// # Errors
///
/// Returns the first [`SyntaxError`]; there is no error recovery.
pub fn parse(tokens: Vec<Token>) -> Result<AstNode, SyntaxError> {
    Parser::new(TokenStream::new(tokens)).parse_program()
}

/// The parser state: a token stream cursor plus nothing else.
///
/// All structure lives in the recursion; the checkpoint stack inside the
/// stream is the only mutable state shared between rule invocations.
#[derive(Debug)]
pub struct Parser {
    stream: TokenStream,
}

impl Parser {
    /// Creates a parser over the given stream.
    #[must_use]
    pub fn new(stream: TokenStream) -> Self {
        Self { stream }
    }

    /// Returns the stream, for reuse after a parse.
    #[must_use]
    pub fn into_stream(self) -> TokenStream {
        self.stream
    }

    /// Parses the whole token sequence into a root `Program` node.
    ///
    /// A program is the ordered list of its top-level units: annotations,
    /// data tables, modules, routines and at most one code block (the
    /// at-most-one check happens at AST assembly, not here). Any token
    /// that starts none of those is a fatal `InvalidToken`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyntaxError`].
    pub fn parse_program(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "program";

        let mut node = AstNode::synthetic(NodeKind::Program);
        while self.stream.has_tokens() {
            let unit = self.try_variants(&[
                Self::parse_annotation,
                Self::parse_data,
                Self::parse_module,
                Self::parse_routine,
                Self::parse_code,
            ])?;

            match unit {
                Some(unit) => {
                    tracing::debug!(kind = unit.kind().name(), "parsed top-level unit");
                    node.add_child(unit);
                }
                None => {
                    let token = self.next_token(RULE)?;
                    return Err(SyntaxError::invalid_token(&token, RULE));
                }
            }
        }

        Ok(node)
    }

    // ========================================================================
    // Backtracking
    // ========================================================================

    /// Tries each alternative from the same fixation point.
    ///
    /// A `Ok(None)` abandons the attempt and rolls the cursor back before
    /// trying the next variant. The first match commits. A fatal error
    /// propagates immediately — no further alternatives are tried.
    pub(super) fn try_variants(&mut self, variants: &[Variant]) -> Parsed {
        for parse in variants {
            self.stream.fixate();
            match parse(self) {
                Ok(Some(node)) => {
                    self.stream.commit();
                    return Ok(Some(node));
                }
                Ok(None) => self.stream.rollback(),
                Err(error) => {
                    self.stream.commit();
                    return Err(error);
                }
            }
        }
        Ok(None)
    }

    /// Collects nodes by repeatedly trying `variants` until none matches.
    pub(super) fn all_children(
        &mut self,
        variants: &[Variant],
    ) -> Result<Vec<AstNode>, SyntaxError> {
        let mut found = Vec::new();
        while let Some(node) = self.try_variants(variants)? {
            found.push(node);
        }
        Ok(found)
    }

    // ========================================================================
    // Token access
    // ========================================================================

    /// Consumes the next token, failing with `UnexpectedEndOfStream` when
    /// the sequence is exhausted.
    pub(super) fn next_token(&mut self, rule: &'static str) -> Result<Token, SyntaxError> {
        self.stream
            .next()
            .ok_or_else(|| SyntaxError::unexpected_end_of_stream(self.end_of_stream_position(), rule))
    }

    /// Returns the next significant token without consuming it.
    pub(super) fn peek_token(&self) -> Option<Token> {
        self.stream.peek()
    }

    /// Synthesizes the position one column past the last real token, for
    /// end-of-stream errors.
    fn end_of_stream_position(&self) -> Option<Position> {
        self.stream.last().map(|token| {
            let p = token.position();
            Position::new(
                Point::new(p.start.line, p.start.symbol + 1),
                Point::new(p.end.line, p.end.symbol + 1),
            )
        })
    }

    /// Consumes the next token if it is the keyword `expected`.
    pub(super) fn accept_keyword(&mut self, expected: &str) -> Option<Token> {
        let token = self.stream.peek()?;
        token.is_keyword(expected).then(|| {
            self.stream.next();
            token
        })
    }

    /// Consumes the next token if it is the delimiter `expected`.
    pub(super) fn accept_delimiter(&mut self, expected: &str) -> Option<Token> {
        let token = self.stream.peek()?;
        token.is_delimiter(expected).then(|| {
            self.stream.next();
            token
        })
    }

    /// Consumes the next token if it is the operator `expected`.
    pub(super) fn accept_operator(&mut self, expected: &str) -> Option<Token> {
        let token = self.stream.peek()?;
        token.is_operator(expected).then(|| {
            self.stream.next();
            token
        })
    }

    /// Consumes the next token if it is an identifier.
    pub(super) fn accept_identifier(&mut self) -> Option<Token> {
        let token = self.stream.peek()?;
        token.is_identifier().then(|| {
            self.stream.next();
            token
        })
    }

    /// Consumes the next token if it is a number literal.
    pub(super) fn accept_number(&mut self) -> Option<Token> {
        let token = self.stream.peek()?;
        token.is_number().then(|| {
            self.stream.next();
            token
        })
    }

    /// Consumes the next token if it is a register.
    pub(super) fn accept_register(&mut self) -> Option<Token> {
        let token = self.stream.peek()?;
        token.is_register().then(|| {
            self.stream.next();
            token
        })
    }

    // ========================================================================
    // Assertions — used after a rule has committed
    // ========================================================================

    /// Consumes the next token, requiring the keyword `expected`.
    pub(super) fn expect_keyword(
        &mut self,
        expected: &'static str,
        rule: &'static str,
    ) -> Result<Token, SyntaxError> {
        let token = self.next_token(rule)?;
        if token.is_keyword(expected) {
            Ok(token)
        } else {
            Err(SyntaxError::unexpected_token(expected, &token, rule))
        }
    }

    /// Consumes the next token, requiring the delimiter `expected`.
    pub(super) fn expect_delimiter(
        &mut self,
        expected: &'static str,
        rule: &'static str,
    ) -> Result<Token, SyntaxError> {
        let token = self.next_token(rule)?;
        if token.is_delimiter(expected) {
            Ok(token)
        } else {
            Err(SyntaxError::unexpected_token(expected, &token, rule))
        }
    }

    /// Consumes the next token, requiring an identifier.
    pub(super) fn expect_identifier(&mut self, rule: &'static str) -> Result<Token, SyntaxError> {
        let token = self.next_token(rule)?;
        if token.is_identifier() {
            Ok(token)
        } else {
            Err(SyntaxError::identifier_expected(&token, rule))
        }
    }

    /// Consumes the next token, requiring a number literal.
    pub(super) fn expect_literal(&mut self, rule: &'static str) -> Result<Token, SyntaxError> {
        let token = self.next_token(rule)?;
        if token.is_number() {
            Ok(token)
        } else {
            Err(SyntaxError::literal_expected(&token, rule))
        }
    }

    /// Consumes the next token, requiring a register.
    pub(super) fn expect_register(&mut self, rule: &'static str) -> Result<Token, SyntaxError> {
        let token = self.next_token(rule)?;
        if token.is_register() {
            Ok(token)
        } else {
            Err(SyntaxError::register_expected(&token, rule))
        }
    }

    /// Consumes the block-closing `end` keyword and widens `node` over it.
    pub(super) fn validate_block_end(
        &mut self,
        node: &mut AstNode,
        rule: &'static str,
    ) -> Result<(), SyntaxError> {
        let token = self.expect_keyword(keyword::END, rule)?;
        node.propagate_token(&token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxErrorKind;
    use crate::source_analysis::{SourceBuffer, normalize, tokenize};

    /// Helper to parse normalized text into the root node.
    pub(crate) fn parse_text(text: &str) -> Result<AstNode, SyntaxError> {
        let mut source = SourceBuffer::new(normalize(text));
        parse(tokenize(&mut source).unwrap())
    }

    /// Helper asserting the debug dump of a successful parse.
    pub(crate) fn assert_dump(text: &str, expected: &str) {
        let root = parse_text(text).unwrap();
        assert_eq!(root.to_debug_string(), expected);
    }

    #[test]
    fn empty_input_is_empty_program() {
        let root = parse_text("").unwrap();
        assert_eq!(root.kind(), NodeKind::Program);
        assert!(root.children().is_empty());
    }

    #[test]
    fn top_level_non_match_is_invalid_token() {
        let err = parse_text("42").unwrap_err();
        assert!(matches!(
            err.kind,
            SyntaxErrorKind::InvalidToken { ref received } if received == "42"
        ));
        assert_eq!(err.rule, "program");
    }

    #[test]
    fn program_collects_units_in_order() {
        let root = parse_text(
            "pragma opt;\n\
             data FOO 1 end\n\
             routine main do end\n\
             code skip_marker := 1; end",
        )
        .unwrap();
        let kinds: Vec<_> = root.children().iter().map(AstNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Annotation,
                NodeKind::Data,
                NodeKind::Routine,
                NodeKind::Code
            ]
        );
    }

    #[test]
    fn unexpected_end_of_stream_position_is_one_past_last_token() {
        let err = parse_text("routine foo(").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedEndOfStream);
        // `(` sits at column 11; the error points one column past it.
        assert_eq!(err.position, Some(Position::on_line(0, 12, 1)));
    }

    #[test]
    fn reparse_after_reset_is_structurally_identical() {
        let text = "module m\n  int x = 1;\n  routine r do break; end\nend";
        let mut source = SourceBuffer::new(normalize(text));
        let tokens = tokenize(&mut source).unwrap();

        let mut parser = Parser::new(TokenStream::new(tokens));
        let first = parser.parse_program().unwrap();

        let mut stream = parser.into_stream();
        stream.reset();
        let second = Parser::new(stream).parse_program().unwrap();

        assert_eq!(first, second);
    }
}
