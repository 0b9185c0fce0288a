// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical infrastructure for Era source code.
//!
//! This module contains everything between raw text and the parser:
//!
//! - [`SourceBuffer`]: a random-access character buffer over normalized text
//! - [`Point`] / [`Position`]: zero-based line/column ranges for tokens and
//!   AST nodes
//! - [`Lexer`]: greedy longest-match tokenizer producing a fully
//!   materialized token sequence
//! - [`TokenStream`]: a skip-filtering cursor with checkpoint/rollback
//!   semantics — the substrate for parser backtracking
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] consumes a [`SourceBuffer`] and produces [`Token`]s.
//!
//! ```
//! use era_core::source_analysis::{Lexer, SourceBuffer, TokenKind};
//!
//! let mut source = SourceBuffer::new("code skip end\n");
//! let tokens = Lexer::new(&mut source).tokenize().unwrap();
//! assert_eq!(tokens[0].kind(), TokenKind::Keyword);
//! ```
//!
//! # Error Handling
//!
//! Tokenization is all-or-nothing: the first unresolvable input aborts with
//! a [`TokenizationError`](crate::error::TokenizationError). There is no
//! error recovery — the grammar is not designed to continue after a fault.

mod lexer;
mod position;
mod source;
mod stream;
mod terminals;
mod token;


pub use lexer::{Lexer, dump_tokens, tokenize};
pub use position::{Point, Position};
pub use source::{SourceBuffer, normalize};
pub use stream::TokenStream;
pub use terminals::{delimiter, keyword, operator};
pub use token::{Token, TokenKind};
