// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! A checkpointed cursor over the materialized token sequence.
//!
//! The [`TokenStream`] is what makes the parser's unlimited backtracking
//! cheap: alternatives fixate the cursor before an attempt and roll back on
//! a non-match, with no re-lexing. Comments and newline markers are
//! transparently skipped by default; the grammar never needs them, but the
//! skip set stays adjustable for forward compatibility.
//!
//! # Checkpoints
//!
//! [`fixate`](TokenStream::fixate) pushes the cursor onto a LIFO stack;
//! [`rollback`](TokenStream::rollback) pops the most recent checkpoint and
//! restores it; [`commit`](TokenStream::commit) pops without restoring.
//! Checkpoints nest: a rule may fixate inside another rule's span, as long
//! as every fixation is eventually matched by exactly one rollback or
//! commit.
//!
//! # Example
//!
//! ```
//! use era_core::source_analysis::{SourceBuffer, TokenStream, tokenize};
//!
//! let mut source = SourceBuffer::new("skip stop\n");
//! let tokens = tokenize(&mut source).unwrap();
//! let mut stream = TokenStream::new(tokens);
//!
//! stream.fixate();
//! assert_eq!(stream.next().unwrap().text(), "skip");
//! stream.rollback();
//! assert_eq!(stream.next().unwrap().text(), "skip");
//! ```

use std::collections::HashSet;

use super::{Token, TokenKind};

/// A cursor over a token sequence with skip-filtering and
/// checkpoint/rollback transaction semantics.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
    checkpoints: Vec<usize>,
    skip: HashSet<TokenKind>,
}

impl TokenStream {
    /// Creates a stream over the given tokens with the default skip set
    /// (`LineComment` and `NewLine`).
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            checkpoints: Vec::new(),
            skip: HashSet::from([TokenKind::LineComment, TokenKind::NewLine]),
        }
    }

    /// Adds or removes a kind from the skip set.
    ///
    /// The current grammar never disables newline skipping, but the
    /// capability exists for newline-significant extensions.
    pub fn set_skipped(&mut self, kind: TokenKind, skipped: bool) {
        if skipped {
            self.skip.insert(kind);
        } else {
            self.skip.remove(&kind);
        }
    }

    /// Returns the next non-skipped token and advances the cursor, or
    /// `None` when the sequence is exhausted.
    pub fn next(&mut self) -> Option<Token> {
        let (token, position) = self.scan_forward()?;
        self.position = position;
        Some(token)
    }

    /// Returns the next non-skipped token without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<Token> {
        self.scan_forward().map(|(token, _)| token)
    }

    /// Returns the previous non-skipped token and moves the cursor back, or
    /// `None` at the start of the sequence.
    pub fn previous(&mut self) -> Option<Token> {
        let (token, position) = self.scan_backward()?;
        self.position = position;
        Some(token)
    }

    /// Returns the previous non-skipped token without moving the cursor.
    #[must_use]
    pub fn peek_previous(&self) -> Option<Token> {
        self.scan_backward().map(|(token, _)| token)
    }

    /// Returns `true` if a non-skipped token remains ahead of the cursor.
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        self.peek().is_some()
    }

    /// Returns the last non-skipped token of the whole sequence, ignoring
    /// the cursor.
    ///
    /// Used to synthesize an "expected more input" position at end of
    /// stream.
    #[must_use]
    pub fn last(&self) -> Option<Token> {
        self.tokens
            .iter()
            .rev()
            .find(|t| !self.skip.contains(&t.kind()))
            .cloned()
    }

    /// Pushes the current cursor position onto the checkpoint stack.
    pub fn fixate(&mut self) {
        self.checkpoints.push(self.position);
    }

    /// Restores the cursor to the most recent checkpoint and discards it.
    ///
    /// # Panics
    ///
    /// Panics if no checkpoint is pending — an unbalanced
    /// fixate/rollback pair is a parser bug, not an input error.
    pub fn rollback(&mut self) {
        self.position = self
            .checkpoints
            .pop()
            .expect("rollback without a pending fixate");
    }

    /// Discards the most recent checkpoint, keeping the cursor where it is.
    ///
    /// # Panics
    ///
    /// Panics if no checkpoint is pending.
    pub fn commit(&mut self) {
        self.checkpoints
            .pop()
            .expect("commit without a pending fixate");
    }

    /// Rewinds the cursor to the start and clears all checkpoints.
    pub fn reset(&mut self) {
        self.position = 0;
        self.checkpoints.clear();
    }

    /// Renders the sequence in the fixture dump format.
    #[must_use]
    pub fn to_debug_string(&self) -> String {
        super::dump_tokens(&self.tokens)
    }

    fn scan_forward(&self) -> Option<(Token, usize)> {
        let mut pos = self.position;
        loop {
            let token = self.tokens.get(pos)?;
            pos += 1;
            if !self.skip.contains(&token.kind()) {
                return Some((token.clone(), pos));
            }
        }
    }

    fn scan_backward(&self) -> Option<(Token, usize)> {
        let mut pos = self.position;
        loop {
            pos = pos.checked_sub(1)?;
            let token = self.tokens.get(pos)?;
            if !self.skip.contains(&token.kind()) {
                return Some((token.clone(), pos));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{SourceBuffer, normalize, tokenize};

    fn stream(text: &str) -> TokenStream {
        let mut source = SourceBuffer::new(normalize(text));
        TokenStream::new(tokenize(&mut source).unwrap())
    }

    #[test]
    fn next_skips_comments_and_newlines() {
        let mut s = stream("a // note\nb");
        assert_eq!(s.next().unwrap().text(), "a");
        assert_eq!(s.next().unwrap().text(), "b");
        assert!(s.next().is_none());
    }

    #[test]
    fn peek_does_not_advance() {
        let s = stream("a b");
        assert_eq!(s.peek().unwrap().text(), "a");
        assert_eq!(s.peek().unwrap().text(), "a");
    }

    #[test]
    fn previous_walks_backward() {
        let mut s = stream("a b");
        s.next();
        s.next();
        assert_eq!(s.previous().unwrap().text(), "b");
        assert_eq!(s.previous().unwrap().text(), "a");
        assert!(s.previous().is_none());
    }

    #[test]
    fn previous_skips_filtered_tokens() {
        let mut s = stream("a // note\nb");
        s.next();
        s.next();
        assert_eq!(s.previous().unwrap().text(), "b");
        assert_eq!(s.previous().unwrap().text(), "a");
    }

    #[test]
    fn has_tokens_matches_peek() {
        let mut s = stream("a");
        assert!(s.has_tokens());
        s.next();
        assert!(!s.has_tokens());
    }

    #[test]
    fn trailing_trivia_does_not_count_as_tokens() {
        let mut s = stream("a // tail comment");
        s.next();
        assert!(!s.has_tokens());
    }

    #[test]
    fn rollback_restores_fixated_position() {
        let mut s = stream("a b c");
        s.next();
        s.fixate();
        s.next();
        s.next();
        s.rollback();
        assert_eq!(s.next().unwrap().text(), "b");
    }

    #[test]
    fn checkpoints_nest_lifo() {
        let mut s = stream("a b c d");
        s.fixate(); // at a
        s.next();
        s.fixate(); // at b
        s.next();
        s.rollback(); // back to b
        assert_eq!(s.peek().unwrap().text(), "b");
        s.rollback(); // back to a
        assert_eq!(s.peek().unwrap().text(), "a");
    }

    #[test]
    fn commit_keeps_cursor() {
        let mut s = stream("a b");
        s.fixate();
        s.next();
        s.commit();
        assert_eq!(s.next().unwrap().text(), "b");
    }

    #[test]
    fn rollback_without_next_is_identity() {
        let mut s = stream("a b");
        s.next();
        let before = s.peek();
        s.fixate();
        s.rollback();
        assert_eq!(s.peek(), before);
    }

    #[test]
    fn last_ignores_cursor_and_skip_tokens() {
        let mut s = stream("a b // done");
        assert_eq!(s.last().unwrap().text(), "b");
        s.next();
        assert_eq!(s.last().unwrap().text(), "b");
    }

    #[test]
    fn reset_rewinds_and_clears_checkpoints() {
        let mut s = stream("a b");
        s.fixate();
        s.next();
        s.reset();
        assert_eq!(s.next().unwrap().text(), "a");
    }

    #[test]
    fn newline_sensitive_mode_can_be_enabled() {
        let mut s = stream("a\nb");
        s.set_skipped(TokenKind::NewLine, false);
        assert_eq!(s.next().unwrap().text(), "a");
        assert_eq!(s.next().unwrap().kind(), TokenKind::NewLine);
        assert_eq!(s.next().unwrap().text(), "b");
    }
}
