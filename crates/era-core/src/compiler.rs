// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The compiler pipeline driver.
//!
//! [`Compiler`] owns the source buffer and runs the two front-end passes —
//! tokenize, then parse — followed by AST assembly into a typed
//! [`Program`]. The passes are strictly sequential: the token sequence is
//! fully materialized before parsing starts, and the first error from any
//! stage aborts the compile.
//!
//! Stage progress is reported through `tracing`; verbosity is the caller's
//! concern (the CLI wires it to `-v` flags).

use crate::ast::{AstNode, Program};
use crate::error::{CompileError, TokenizationError};
use crate::parse;
use crate::source_analysis::{SourceBuffer, Token, normalize, tokenize};

/// Drives source text through the front end.
///
/// # Examples
///
/// ```
/// use era_core::Compiler;
///
/// let mut compiler = Compiler::new("code R1 := R2; end");
/// let program = compiler.compile().unwrap();
/// assert!(program.code.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    source: SourceBuffer,
}

impl Compiler {
    /// Creates a compiler for raw source text, normalizing line endings.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            source: SourceBuffer::new(normalize(text)),
        }
    }

    /// Returns the source buffer, for diagnostic highlighting.
    #[must_use]
    pub fn source(&self) -> &SourceBuffer {
        &self.source
    }

    /// Runs the lexer over the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns the first [`TokenizationError`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TokenizationError> {
        let tokens = tokenize(&mut self.source)?;
        tracing::debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Runs tokenize-then-parse, producing the root `Program` node.
    ///
    /// # Errors
    ///
    /// Returns the first tokenization or syntax error.
    pub fn parse(&mut self) -> Result<AstNode, CompileError> {
        let tokens = self.tokenize()?;
        let root = parse::parse(tokens)?;
        tracing::debug!(units = root.children().len(), "parsed program");
        Ok(root)
    }

    /// Runs the full front end: tokenize, parse, assemble.
    ///
    /// # Errors
    ///
    /// Returns the first tokenization, syntax, or semantic error.
    pub fn compile(&mut self) -> Result<Program, CompileError> {
        let root = self.parse()?;
        let program = Program::from_root(root)?;
        tracing::debug!(
            annotations = program.annotations.len(),
            data = program.data.len(),
            modules = program.modules.len(),
            routines = program.routines.len(),
            has_code = program.code.is_some(),
            "assembled program"
        );
        Ok(program)
    }

    /// Renders `error` with source highlighting against this compiler's
    /// buffer.
    #[must_use]
    pub fn render_error(&self, error: &CompileError) -> String {
        crate::diagnostics::render(error, &self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::error::SemanticErrorKind;

    #[test]
    fn compile_full_program() {
        let mut compiler = Compiler::new(
            "pragma opt(level1);\n\
             data FOO 1, 2, 3 end\n\
             module math\n\
               routine add(R1, R2) : (R0) do\n\
                 asm R0 := R1;\n\
                 asm R0 += R2;\n\
               end\n\
             end\n\
             code\n\
               math.add(1, 2);\n\
             end\n",
        );
        let program = compiler.compile().unwrap();
        assert_eq!(program.annotations.len(), 1);
        assert_eq!(program.data.len(), 1);
        assert_eq!(program.modules.len(), 1);
        assert!(program.routines.is_empty());
        assert!(program.code.is_some());
    }

    #[test]
    fn duplicate_code_block_fails_at_assembly() {
        let mut compiler = Compiler::new("code end code end");
        // The parse itself succeeds; assembly raises the semantic error.
        let root = Compiler::new("code end code end").parse().unwrap();
        assert_eq!(root.children().len(), 2);

        let err = compiler.compile().unwrap_err();
        let CompileError::Semantic(semantic) = err else {
            panic!("expected semantic error, got {err:?}");
        };
        assert_eq!(semantic.kind, SemanticErrorKind::DuplicateCodeBlock);
    }

    #[test]
    fn tokenization_error_surfaces_verbatim() {
        let mut compiler = Compiler::new("code @ end");
        let err = compiler.compile().unwrap_err();
        assert!(matches!(err, CompileError::Tokenization(_)));
    }

    #[test]
    fn rendered_error_points_at_source() {
        let mut compiler = Compiler::new("data FOO x end");
        let err = compiler.compile().unwrap_err();
        let rendered = compiler.render_error(&err);
        assert!(rendered.contains("| data FOO x end"));
        assert!(rendered.contains("---------^"));
    }

    #[test]
    fn parse_produces_program_root() {
        let mut compiler = Compiler::new("routine noop do end");
        let root = compiler.parse().unwrap();
        assert_eq!(root.kind(), NodeKind::Program);
        assert_eq!(root.children()[0].kind(), NodeKind::Routine);
    }
}
