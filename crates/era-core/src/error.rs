// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Era compiler front end.
//!
//! Three error kinds share the same shape — a kind enum plus the optional
//! [`Position`] of the offending source range:
//!
//! - [`TokenizationError`]: the lexer could not resolve input into a token
//! - [`SyntaxError`]: the token sequence does not match the grammar
//! - [`SemanticError`]: reserved for later phases; currently only the
//!   duplicate `code` block check raised at AST assembly
//!
//! Nothing is recovered locally: the first error anywhere aborts the
//! compile and surfaces verbatim at the top level, where
//! [`diagnostics`](crate::diagnostics) renders it with source highlighting.
//!
//! Inside the parser, a rule returning `Ok(None)` is *not* an error — it
//! means "this alternative doesn't apply here" and is reserved strictly for
//! backtracking. Once a rule has committed, every subsequent problem is a
//! [`SyntaxError`].

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use crate::source_analysis::{Position, Token};

/// A lexical error encountered while producing the token sequence.
///
/// Tokenization is strict: the lexer aborts on the first unresolvable
/// input rather than emitting placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(era::tokenization_error))]
pub struct TokenizationError {
    /// The kind of lexical error.
    #[source]
    pub kind: TokenizationErrorKind,
    /// The source location of the error.
    pub position: Option<Position>,
}

impl TokenizationError {
    /// Creates a new tokenization error.
    #[must_use]
    pub fn new(kind: TokenizationErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }

    /// Creates an "unknown symbol" error for unresolvable text.
    #[must_use]
    pub fn unknown_symbol(text: impl Into<EcoString>, position: Position) -> Self {
        Self::new(
            TokenizationErrorKind::UnknownSymbol { text: text.into() },
            Some(position),
        )
    }

    /// Creates the error for a newline arriving mid-token.
    #[must_use]
    pub fn unexpected_end_of_line(pending: impl Into<EcoString>, position: Position) -> Self {
        Self::new(
            TokenizationErrorKind::UnexpectedEndOfLine {
                pending: pending.into(),
            },
            Some(position),
        )
    }

    /// Creates the error for unresolved text at end of input.
    #[must_use]
    pub fn failed(pending: impl Into<EcoString>, position: Position) -> Self {
        Self::new(
            TokenizationErrorKind::TokenizationFailed {
                pending: pending.into(),
            },
            Some(position),
        )
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizationErrorKind {
    /// Accumulated text resolves to no terminal, identifier, number or
    /// register.
    #[error("unknown symbol `{text}`")]
    UnknownSymbol {
        /// The unresolvable text.
        text: EcoString,
    },

    /// A raw newline arrived while a token was still being read — tokens
    /// cannot span lines.
    #[error("got new line while reading token `{pending}`")]
    UnexpectedEndOfLine {
        /// The half-read token text.
        pending: EcoString,
    },

    /// Input ended while a token was still being read.
    #[error("failed to tokenize string `{pending}`")]
    TokenizationFailed {
        /// The half-read token text.
        pending: EcoString,
    },
}

/// A grammar mismatch reported by the parser.
///
/// Every syntax error names the grammar rule that was executing when the
/// mismatch was detected — rules pass their own names explicitly, so the
/// message never depends on call-stack introspection.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind} (while parsing {rule})")]
#[diagnostic(code(era::syntax_error))]
pub struct SyntaxError {
    /// The kind of grammar mismatch.
    pub kind: SyntaxErrorKind,
    /// The position of the offending token, or a synthesized one-past-the-
    /// last-token position at end of stream.
    pub position: Option<Position>,
    /// The grammar rule that was executing.
    pub rule: &'static str,
}

impl SyntaxError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(kind: SyntaxErrorKind, position: Option<Position>, rule: &'static str) -> Self {
        Self {
            kind,
            position,
            rule,
        }
    }

    /// Creates an "unexpected end of stream" error at the given position.
    #[must_use]
    pub fn unexpected_end_of_stream(position: Option<Position>, rule: &'static str) -> Self {
        Self::new(SyntaxErrorKind::UnexpectedEndOfStream, position, rule)
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected_token(expected: impl Into<EcoString>, received: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::UnexpectedToken {
                expected: expected.into(),
                received: received.text().into(),
            },
            Some(received.position()),
            rule,
        )
    }

    /// Creates an "identifier expected" error.
    #[must_use]
    pub fn identifier_expected(received: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::IdentifierExpected {
                received: received.text().into(),
            },
            Some(received.position()),
            rule,
        )
    }

    /// Creates a "literal expected" error.
    #[must_use]
    pub fn literal_expected(received: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::LiteralExpected {
                received: received.text().into(),
            },
            Some(received.position()),
            rule,
        )
    }

    /// Creates a "register expected" error.
    #[must_use]
    pub fn register_expected(received: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::RegisterExpected {
                received: received.text().into(),
            },
            Some(received.position()),
            rule,
        )
    }

    /// Creates a "type expected" error.
    #[must_use]
    pub fn type_expected(received: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::TypeExpected {
                received: received.text().into(),
            },
            Some(received.position()),
            rule,
        )
    }

    /// Creates an "invalid token" error for a top-level non-match.
    #[must_use]
    pub fn invalid_token(received: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::InvalidToken {
                received: received.text().into(),
            },
            Some(received.position()),
            rule,
        )
    }

    /// Creates the error for a dereference combined with a compound
    /// assembly operator.
    #[must_use]
    pub fn invalid_asm_dereference_use(operator: &Token, rule: &'static str) -> Self {
        Self::new(
            SyntaxErrorKind::InvalidAsmDereferenceUse {
                operator: operator.text().into(),
            },
            Some(operator.position()),
            rule,
        )
    }
}

/// The kind of grammar mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// The stream ran out of tokens mid-rule.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// A specific terminal was required and something else arrived.
    #[error("unexpected token, expected `{expected}` but got `{received}`")]
    UnexpectedToken {
        /// The terminal the rule required.
        expected: EcoString,
        /// The text of the token that arrived instead.
        received: EcoString,
    },

    /// An identifier was required.
    #[error("identifier expected, got `{received}`")]
    IdentifierExpected {
        /// The text of the token that arrived instead.
        received: EcoString,
    },

    /// A numeric literal was required.
    #[error("literal expected, got `{received}`")]
    LiteralExpected {
        /// The text of the token that arrived instead.
        received: EcoString,
    },

    /// A register was required.
    #[error("register expected, got `{received}`")]
    RegisterExpected {
        /// The text of the token that arrived instead.
        received: EcoString,
    },

    /// A type keyword (`int`, `short`, `byte`) was required.
    #[error("type expected, got `{received}`")]
    TypeExpected {
        /// The text of the token that arrived instead.
        received: EcoString,
    },

    /// No top-level production matched the token.
    #[error("invalid token `{received}` encountered")]
    InvalidToken {
        /// The text of the offending token.
        received: EcoString,
    },

    /// A dereference marker was combined with a compound assembly
    /// operator; only the plain `:=` permits dereference.
    #[error("dereference may only be combined with `:=`, got `{operator}`")]
    InvalidAsmDereferenceUse {
        /// The offending operator text.
        operator: EcoString,
    },
}

/// An error raised while assembling or checking the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(era::semantic_error))]
pub struct SemanticError {
    /// The kind of semantic error.
    #[source]
    pub kind: SemanticErrorKind,
    /// The source location of the error.
    pub position: Option<Position>,
}

impl SemanticError {
    /// Creates a "duplicate code block" error.
    #[must_use]
    pub fn duplicate_code_block(position: Option<Position>) -> Self {
        Self {
            kind: SemanticErrorKind::DuplicateCodeBlock,
            position,
        }
    }
}

/// The kind of semantic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    /// A program may contain at most one `code` block.
    #[error("program defines more than one code block")]
    DuplicateCodeBlock,
}

/// Any error the compiler pipeline can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CompileError {
    /// The lexer failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Tokenization(#[from] TokenizationError),

    /// The parser failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    /// AST assembly failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Semantic(#[from] SemanticError),
}

impl CompileError {
    /// Returns the position of the offending source range, if known.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Tokenization(e) => e.position,
            Self::Syntax(e) => e.position,
            Self::Semantic(e) => e.position,
        }
    }

    /// Returns the human-readable error category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Tokenization(_) => "tokenization error",
            Self::Syntax(_) => "syntax error",
            Self::Semantic(_) => "semantic error",
        }
    }
}
