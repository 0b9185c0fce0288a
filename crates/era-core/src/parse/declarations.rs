// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing for Era.
//!
//! This module handles the top-level units and the declarations nested
//! inside them:
//!
//! - Annotations: `pragma opt(level1), trace;`
//! - Data tables: `data FOO 1, 2, 3 end`
//! - Modules: `module m … end`
//! - Routines with attributes, parameters, results, forward declarations
//! - Variable and constant declarations
//! - The single executable `code` block

use crate::ast::{AstNode, NodeKind};
use crate::error::SyntaxError;
use crate::source_analysis::{Position, Token, delimiter, keyword};

use super::{Parsed, Parser};

impl Parser {
    // ========================================================================
    // Annotations
    // ========================================================================

    /// Parses a pragma annotation.
    ///
    /// Syntax: `pragma name(text), name2(text2), …;` — a comma-separated
    /// list of declarations, each an identifier with optional free-form
    /// parenthesized text.
    pub(super) fn parse_annotation(&mut self) -> Parsed {
        const RULE: &str = "annotation";

        let Some(pragma) = self.accept_keyword(keyword::PRAGMA) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Annotation, &pragma);
        loop {
            node.add_child(self.parse_pragma_declaration()?);
            if self.accept_delimiter(delimiter::COMMA).is_none() {
                break;
            }
        }

        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    /// Parses one `name(text)` pragma declaration.
    fn parse_pragma_declaration(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "pragma_declaration";

        let mut node = AstNode::synthetic(NodeKind::PragmaDeclaration);
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));

        if let Some(open) = self.accept_delimiter(delimiter::PAREN_OPEN) {
            let (text, span, close) = self.read_pragma_text(RULE)?;
            let mut text_node = AstNode::with_value(NodeKind::PragmaText, text);
            text_node.propagate_position(span.unwrap_or_else(|| {
                open.position().merge(close.position())
            }));
            node.add_child(text_node);
        }

        Ok(node)
    }

    /// Reads free-form pragma text up to the closing paren.
    ///
    /// The original grammar reads this character by character, but the
    /// parser only sees the materialized token sequence — so the text is
    /// rebuilt from token lexemes, re-inserting the spacing implied by the
    /// column gap between adjacent tokens. Nested parens are not
    /// supported.
    fn read_pragma_text(
        &mut self,
        rule: &'static str,
    ) -> Result<(String, Option<Position>, Token), SyntaxError> {
        let mut text = String::new();
        let mut span: Option<Position> = None;
        let mut previous: Option<Token> = None;

        loop {
            let token = self.next_token(rule)?;
            if token.is_delimiter(delimiter::PAREN_CLOSE) {
                return Ok((text, span, token));
            }

            if let Some(previous) = &previous {
                let prev_end = previous.position().end;
                let start = token.position().start;
                let gap = if prev_end.line == start.line {
                    start.symbol.saturating_sub(prev_end.symbol)
                } else {
                    1
                };
                for _ in 0..gap {
                    text.push(' ');
                }
            }

            text.push_str(token.text());
            span = Some(match span {
                Some(span) => span.merge(token.position()),
                None => token.position(),
            });
            previous = Some(token);
        }
    }

    // ========================================================================
    // Data tables
    // ========================================================================

    /// Parses a named constant table: `data FOO 1, 2, 3 end`.
    ///
    /// The literal list may be empty.
    pub(super) fn parse_data(&mut self) -> Parsed {
        const RULE: &str = "data";

        let Some(data) = self.accept_keyword(keyword::DATA) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Data, &data);
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));

        if self
            .peek_token()
            .is_some_and(|t| !t.is_keyword(keyword::END))
        {
            loop {
                let literal = self.expect_literal(RULE)?;
                node.add_child(AstNode::from_token(NodeKind::Literal, &literal));
                if self.accept_delimiter(delimiter::COMMA).is_none() {
                    break;
                }
            }
        }

        self.validate_block_end(&mut node, RULE)?;
        Ok(Some(node))
    }

    // ========================================================================
    // Modules
    // ========================================================================

    /// Parses a module: `module name (var-decl | routine)* end`.
    pub(super) fn parse_module(&mut self) -> Parsed {
        const RULE: &str = "module";

        let Some(module) = self.accept_keyword(keyword::MODULE) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Module, &module);
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));

        let members = self.all_children(&[Self::parse_var_declaration, Self::parse_routine])?;
        node.add_children(members);

        self.validate_block_end(&mut node, RULE)?;
        Ok(Some(node))
    }

    // ========================================================================
    // Routines
    // ========================================================================

    /// Parses a routine declaration or definition.
    ///
    /// Syntax: `('start'|'entry')? 'routine' name ('(' params ')')?
    /// (':' '(' results ')')? (';' | 'do' body 'end')` — a trailing `;`
    /// makes it a forward declaration with no body.
    pub(super) fn parse_routine(&mut self) -> Parsed {
        const RULE: &str = "routine";

        let attribute = self
            .accept_keyword(keyword::START)
            .or_else(|| self.accept_keyword(keyword::ENTRY));

        let Some(routine) = self.accept_keyword(keyword::ROUTINE) else {
            return match attribute {
                // An attribute commits: it cannot introduce anything else.
                Some(_) => {
                    let token = self.next_token(RULE)?;
                    Err(SyntaxError::unexpected_token(keyword::ROUTINE, &token, RULE))
                }
                None => Ok(None),
            };
        };

        let mut node = AstNode::at_token(NodeKind::Routine, &routine);
        if let Some(attribute) = &attribute {
            node.add_child(AstNode::from_token(NodeKind::RoutineAttribute, attribute));
        }

        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));

        if self.accept_delimiter(delimiter::PAREN_OPEN).is_some() {
            node.add_child(self.parse_parameters()?);
        }

        if self.accept_delimiter(delimiter::COLON).is_some() {
            self.expect_delimiter(delimiter::PAREN_OPEN, RULE)?;
            node.add_child(self.parse_results()?);
        }

        if let Some(semicolon) = self.accept_delimiter(delimiter::SEMICOLON) {
            // Forward declaration: no body.
            node.propagate_token(&semicolon);
            return Ok(Some(node));
        }

        self.expect_keyword(keyword::DO, RULE)?;
        let mut body = AstNode::synthetic(NodeKind::RoutineBody);
        let statements = self.all_children(&[Self::parse_var_declaration, Self::parse_statement])?;
        body.add_children(statements);
        node.add_child(body);

        self.validate_block_end(&mut node, RULE)?;
        Ok(Some(node))
    }

    /// Parses the parenthesized parameter list, consuming the closing `)`.
    fn parse_parameters(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "parameters";

        let mut node = AstNode::synthetic(NodeKind::Parameters);
        if let Some(close) = self.accept_delimiter(delimiter::PAREN_CLOSE) {
            node.propagate_token(&close);
            return Ok(node);
        }

        loop {
            node.add_child(self.parse_parameter()?);
            if self.accept_delimiter(delimiter::COMMA).is_none() {
                break;
            }
        }

        let close = self.expect_delimiter(delimiter::PAREN_CLOSE, RULE)?;
        node.propagate_token(&close);
        Ok(node)
    }

    /// Parses one parameter: a bare register, or a `type identifier` pair.
    fn parse_parameter(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "parameter";

        let mut node = AstNode::synthetic(NodeKind::Parameter);
        if let Some(register) = self.accept_register() {
            node.add_child(AstNode::from_token(NodeKind::Register, &register));
            return Ok(node);
        }

        let var_type = self.expect_type(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::VarType, &var_type));
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));
        Ok(node)
    }

    /// Parses the parenthesized result list (bare registers only),
    /// consuming the closing `)`.
    fn parse_results(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "results";

        let mut node = AstNode::synthetic(NodeKind::Results);
        if let Some(close) = self.accept_delimiter(delimiter::PAREN_CLOSE) {
            node.propagate_token(&close);
            return Ok(node);
        }

        loop {
            let register = self.expect_register(RULE)?;
            node.add_child(AstNode::from_token(NodeKind::Register, &register));
            if self.accept_delimiter(delimiter::COMMA).is_none() {
                break;
            }
        }

        let close = self.expect_delimiter(delimiter::PAREN_CLOSE, RULE)?;
        node.propagate_token(&close);
        Ok(node)
    }

    // ========================================================================
    // Variables and constants
    // ========================================================================

    /// Parses either a variable or a constant declaration.
    pub(super) fn parse_var_declaration(&mut self) -> Parsed {
        self.try_variants(&[Self::parse_variable, Self::parse_constant])
    }

    /// Parses a variable declaration:
    /// `type name (= expr | [ expr ])?, …;`.
    pub(super) fn parse_variable(&mut self) -> Parsed {
        const RULE: &str = "variable";

        let Some(var_type) = self.accept_type() else {
            return Ok(None);
        };

        let mut node = AstNode::synthetic(NodeKind::Variable);
        node.add_child(AstNode::from_token(NodeKind::VarType, &var_type));

        loop {
            node.add_child(self.parse_var_definition()?);
            if self.accept_delimiter(delimiter::COMMA).is_none() {
                break;
            }
        }

        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    /// Parses one variable definition: bare name, `name = expr`
    /// initializer, or `name[expr]` array definition whose bound is
    /// evaluated later, not at parse time.
    fn parse_var_definition(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "var_definition";

        let mut node = AstNode::synthetic(NodeKind::VarDefinition);
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));

        if self.accept_operator("=").is_some() {
            node.add_child(self.require_expression(RULE)?);
        } else if self.accept_delimiter(delimiter::BRACKET_OPEN).is_some() {
            node.set_value("array");
            node.add_child(self.require_expression(RULE)?);
            let close = self.expect_delimiter(delimiter::BRACKET_CLOSE, RULE)?;
            node.propagate_token(&close);
        }

        Ok(node)
    }

    /// Parses a constant declaration: `const name = expr, …;`.
    pub(super) fn parse_constant(&mut self) -> Parsed {
        const RULE: &str = "constant";

        let Some(constant) = self.accept_keyword(keyword::CONST) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Constant, &constant);
        loop {
            node.add_child(self.parse_const_definition()?);
            if self.accept_delimiter(delimiter::COMMA).is_none() {
                break;
            }
        }

        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    /// Parses one `name = expr` constant definition.
    fn parse_const_definition(&mut self) -> Result<AstNode, SyntaxError> {
        const RULE: &str = "const_definition";

        let mut node = AstNode::synthetic(NodeKind::ConstDefinition);
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));

        let equals = self.next_token(RULE)?;
        if !equals.is_operator("=") {
            return Err(SyntaxError::unexpected_token("=", &equals, RULE));
        }
        node.add_child(self.require_expression(RULE)?);
        Ok(node)
    }

    // ========================================================================
    // Code block
    // ========================================================================

    /// Parses the executable entry section: `code (var-decl | statement)* end`.
    ///
    /// A second `code` block is a semantic error detected at AST assembly,
    /// not here.
    pub(super) fn parse_code(&mut self) -> Parsed {
        const RULE: &str = "code";

        let Some(code) = self.accept_keyword(keyword::CODE) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Code, &code);
        let body = self.all_children(&[Self::parse_var_declaration, Self::parse_statement])?;
        node.add_children(body);

        self.validate_block_end(&mut node, RULE)?;
        Ok(Some(node))
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Consumes the next token if it is a type keyword.
    pub(super) fn accept_type(&mut self) -> Option<Token> {
        self.accept_keyword(keyword::INT)
            .or_else(|| self.accept_keyword(keyword::SHORT))
            .or_else(|| self.accept_keyword(keyword::BYTE))
    }

    /// Consumes the next token, requiring a type keyword.
    pub(super) fn expect_type(&mut self, rule: &'static str) -> Result<Token, SyntaxError> {
        let token = self.next_token(rule)?;
        if token.is_keyword(keyword::INT)
            || token.is_keyword(keyword::SHORT)
            || token.is_keyword(keyword::BYTE)
        {
            Ok(token)
        } else {
            Err(SyntaxError::type_expected(&token, rule))
        }
    }

}
