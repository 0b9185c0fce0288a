// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the parser's backtracking substrate.
//!
//! The checkpoint invariant is the one the whole grammar depends on: after
//! any interleaving of fixate, rollback and stepping, a rollback restores
//! the cursor to exactly where the matching fixate left it.

use proptest::prelude::*;

use crate::source_analysis::{SourceBuffer, Token, TokenStream, normalize, tokenize};

use super::parse;

fn fixture_stream() -> TokenStream {
    let mut source = SourceBuffer::new(normalize(
        "code int a = 1; b := a + 2; f(a, b); asm R1 := R2; end",
    ));
    TokenStream::new(tokenize(&mut source).unwrap())
}

proptest! {
    /// Rollback always restores the cursor to the matching fixate point,
    /// for any interleaving of fixate/rollback/next.
    #[test]
    fn checkpoint_rollback_restores_cursor(ops in prop::collection::vec(0u8..3, 0..64)) {
        let mut stream = fixture_stream();
        let mut shadow: Vec<Option<Token>> = Vec::new();

        for op in ops {
            match op {
                0 => {
                    stream.fixate();
                    shadow.push(stream.peek());
                }
                1 => {
                    if shadow.is_empty() {
                        continue;
                    }
                    stream.rollback();
                    let saved = shadow.pop().unwrap();
                    prop_assert_eq!(stream.peek(), saved);
                }
                _ => {
                    stream.next();
                }
            }
        }
    }

    /// Parsing the same token stream twice yields structurally identical
    /// trees.
    #[test]
    fn parsing_is_deterministic(name in "[a-z]{1,6}", value in 0i64..10_000) {
        // Prefixing keeps generated names out of the keyword table.
        let text = format!("code v{name} := {value}; end");
        let mut source = SourceBuffer::new(normalize(&text));
        let tokens = tokenize(&mut source).unwrap();

        let first = parse(tokens.clone()).unwrap();
        let second = parse(tokens).unwrap();
        prop_assert_eq!(first, second);
    }

    /// A parsed literal's numeric conversion matches the generated value.
    #[test]
    fn literal_conversion_round_trips(value in -9_999_999i64..9_999_999) {
        let text = format!("data T {value} end");
        let mut source = SourceBuffer::new(normalize(&text));
        let root = parse(tokenize(&mut source).unwrap()).unwrap();
        let literal = &root.children()[0].children()[1];
        prop_assert_eq!(literal.numeric_value(), Some(value));
    }
}
