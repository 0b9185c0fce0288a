// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing for Era.
//!
//! A statement is an optional `<label>` prefix followed by exactly one of:
//!
//! - An assembly block: `asm R1 := R2;` or `asm skip, R1 += R2 end`
//! - An "extension statement": if, for/while/infinite loop, break, goto,
//!   call, swap, or assignment — tried in that priority order, because
//!   call, swap and assignment share a primary prefix and must be
//!   disambiguated by the token that follows it (`(` or `.` for a call,
//!   `<=>` for a swap, `:=` for an assignment) via fixate/rollback.
//!
//! # Assembly dereference rule
//!
//! An assembly operation may carry a leading or trailing `*` dereference
//! marker, but only around the plain `:=` assignment. Any compound
//! operator combined with a dereference is a fatal
//! `InvalidAsmDereferenceUse`.

use crate::ast::{AstNode, NodeKind};
use crate::error::SyntaxError;
use crate::source_analysis::{Token, TokenKind, delimiter, keyword, operator};

use super::{Parsed, Parser};

/// The operators an assembly operation accepts between its operands.
const ASSEMBLY_OPERATORS: &[&str] = &[
    operator::ASSIGN,
    operator::ASSIGN_PLUS,
    operator::ASSIGN_MINUS,
    operator::ASSIGN_SHIFT_RIGHT,
    operator::ASSIGN_SHIFT_LEFT,
    operator::ASSIGN_OR,
    operator::ASSIGN_AND,
    operator::ASSIGN_XOR,
    operator::ASSIGN_LESS,
    operator::ASSIGN_GREATER,
    operator::ASSIGN_COND,
];

impl Parser {
    // ========================================================================
    // Statements and labels
    // ========================================================================

    /// Parses one statement, with an optional label prefix.
    ///
    /// Unlabelled statements produce their body node directly; a label
    /// wraps `[Label, body]` in a `Statement` node.
    pub(super) fn parse_statement(&mut self) -> Parsed {
        const RULE: &str = "statement";

        let label = self.parse_label()?;
        let body = self.try_variants(&[
            Self::parse_assembly_block,
            Self::parse_extension_statement,
        ])?;

        match (label, body) {
            (Some(label), Some(body)) => {
                let mut node = AstNode::synthetic(NodeKind::Statement);
                node.add_child(label);
                node.add_child(body);
                Ok(Some(node))
            }
            (None, Some(body)) => Ok(Some(body)),
            (Some(_), None) => {
                // A label commits: something must follow it.
                let token = self.next_token(RULE)?;
                Err(SyntaxError::unexpected_token("statement", &token, RULE))
            }
            (None, None) => Ok(None),
        }
    }

    /// Parses a `<name>` label prefix.
    fn parse_label(&mut self) -> Parsed {
        self.try_variants(&[Self::parse_label_inner])
    }

    fn parse_label_inner(&mut self) -> Parsed {
        let Some(open) = self.accept_operator(operator::LESS) else {
            return Ok(None);
        };
        let Some(name) = self.accept_identifier() else {
            return Ok(None);
        };
        let Some(close) = self.accept_operator(operator::GREATER) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Label, &open);
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));
        node.propagate_token(&close);
        Ok(Some(node))
    }

    /// Parses one of the non-assembly statement forms.
    fn parse_extension_statement(&mut self) -> Parsed {
        self.try_variants(&[
            Self::parse_if_statement,
            Self::parse_for_loop,
            Self::parse_while_loop,
            Self::parse_infinite_loop,
            Self::parse_break_statement,
            Self::parse_goto_statement,
            Self::parse_call_statement,
            Self::parse_swap_statement,
            Self::parse_assignment_statement,
        ])
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    /// Parses an assembly block.
    ///
    /// Two forms share the `asm` keyword: a single inline statement
    /// terminated by `;`, or a comma-separated list terminated by `end`.
    pub(super) fn parse_assembly_block(&mut self) -> Parsed {
        const RULE: &str = "assembly_block";

        let Some(asm) = self.accept_keyword(keyword::ASM) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::AssemblyBlock, &asm);
        node.add_child(self.require_assembly_statement(RULE)?);

        if let Some(semicolon) = self.accept_delimiter(delimiter::SEMICOLON) {
            node.propagate_token(&semicolon);
            return Ok(Some(node));
        }

        while self.accept_delimiter(delimiter::COMMA).is_some() {
            node.add_child(self.require_assembly_statement(RULE)?);
        }

        self.validate_block_end(&mut node, RULE)?;
        Ok(Some(node))
    }

    /// Parses one assembly statement, failing if none of the three forms
    /// applies — `asm` has committed by the time this is called.
    fn require_assembly_statement(&mut self, rule: &'static str) -> Result<AstNode, SyntaxError> {
        let statement = self.try_variants(&[
            Self::parse_assembly_meta,
            Self::parse_assembly_condition,
            Self::parse_assembly_operation,
        ])?;
        match statement {
            Some(statement) => Ok(statement),
            None => {
                let token = self.next_token(rule)?;
                Err(SyntaxError::unexpected_token(
                    "assembly statement",
                    &token,
                    rule,
                ))
            }
        }
    }

    /// Parses a meta-operation: `skip` or `stop`.
    fn parse_assembly_meta(&mut self) -> Parsed {
        let meta = self
            .accept_keyword(keyword::SKIP)
            .or_else(|| self.accept_keyword(keyword::STOP));
        Ok(meta.map(|token| AstNode::from_token(NodeKind::AssemblyMetaOperation, &token)))
    }

    /// Parses an assembly condition: `if register goto (register | expr)`.
    fn parse_assembly_condition(&mut self) -> Parsed {
        const RULE: &str = "assembly_condition";

        let Some(if_token) = self.accept_keyword(keyword::IF) else {
            return Ok(None);
        };

        let mut node = AstNode::from_token(NodeKind::AssemblyCondition, &if_token);
        let register = self.expect_register(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Register, &register));

        self.expect_keyword(keyword::GOTO, RULE)?;

        if let Some(target) = self.accept_register() {
            node.add_child(AstNode::from_token(NodeKind::Register, &target));
        } else {
            node.add_child(self.require_expression(RULE)?);
        }

        Ok(Some(node))
    }

    /// Parses a register operation with an optional `format` prefix and
    /// optional dereference markers:
    /// `('format' (8|16|32))? '*'? receiver op '*'? operand`.
    fn parse_assembly_operation(&mut self) -> Parsed {
        const RULE: &str = "assembly_operation";

        let format = if self.accept_keyword(keyword::FORMAT).is_some() {
            let width = self.expect_literal(RULE)?;
            if !matches!(width.text(), "8" | "16" | "32") {
                return Err(SyntaxError::unexpected_token("8, 16 or 32", &width, RULE));
            }
            Some(AstNode::from_token(NodeKind::AssemblyOperationFormat, &width))
        } else {
            None
        };

        let dereference_target = self.accept_operator(operator::ASTERISK);

        let Some(target) = self.parse_receiver()? else {
            return if format.is_some() || dereference_target.is_some() {
                // `format`/`*` commit the operation form.
                let token = self.next_token(RULE)?;
                Err(SyntaxError::unexpected_token("receiver", &token, RULE))
            } else {
                Ok(None)
            };
        };

        let op = self.next_token(RULE)?;
        if op.kind() != TokenKind::Operator || !ASSEMBLY_OPERATORS.contains(&op.text()) {
            return if format.is_some() || dereference_target.is_some() {
                Err(SyntaxError::unexpected_token("assignment operator", &op, RULE))
            } else {
                Ok(None)
            };
        }

        if dereference_target.is_some() && !op.is_operator(operator::ASSIGN) {
            return Err(SyntaxError::invalid_asm_dereference_use(&op, RULE));
        }

        let dereference_source = self.accept_operator(operator::ASTERISK);
        if dereference_source.is_some() && !op.is_operator(operator::ASSIGN) {
            return Err(SyntaxError::invalid_asm_dereference_use(&op, RULE));
        }

        let source = self.require_operand(RULE)?;

        let mut node = AstNode::from_token(NodeKind::AssemblyOperation, &op);
        if let Some(format) = format {
            node.add_child(format);
        }
        node.add_child(Self::wrap_dereference(dereference_target, target));
        node.add_child(Self::wrap_dereference(dereference_source, source));
        Ok(Some(node))
    }

    /// Wraps `inner` in a `Dereference` node when a `*` marker was read.
    fn wrap_dereference(marker: Option<Token>, inner: AstNode) -> AstNode {
        match marker {
            Some(star) => {
                let mut node = AstNode::at_token(NodeKind::Dereference, &star);
                node.add_child(inner);
                node
            }
            None => inner,
        }
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// Parses `if expr do block (elif expr do block)* (else block)? end`.
    fn parse_if_statement(&mut self) -> Parsed {
        const RULE: &str = "if_statement";

        let Some(if_token) = self.accept_keyword(keyword::IF) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::IfStatement, &if_token);
        node.add_child(self.require_expression(RULE)?);
        self.expect_keyword(keyword::DO, RULE)?;
        node.add_child(self.parse_block_body()?);

        while self.accept_keyword(keyword::ELIF).is_some() {
            node.add_child(self.require_expression(RULE)?);
            self.expect_keyword(keyword::DO, RULE)?;
            node.add_child(self.parse_block_body()?);
        }

        if self.accept_keyword(keyword::ELSE).is_some() {
            node.add_child(self.parse_block_body()?);
        }

        self.validate_block_end(&mut node, RULE)?;
        Ok(Some(node))
    }

    /// Parses the statement list of an `if` branch.
    fn parse_block_body(&mut self) -> Result<AstNode, SyntaxError> {
        let mut node = AstNode::synthetic(NodeKind::BlockBody);
        let body = self.all_children(&[Self::parse_var_declaration, Self::parse_statement])?;
        node.add_children(body);
        Ok(node)
    }

    /// Parses `for id (from expr)? (to expr)? (step expr)? loop … end`.
    ///
    /// Omitted clauses leave an `EmptyExpression` marker, so the loop node
    /// always has the same shape: counter, from, to, step, body.
    fn parse_for_loop(&mut self) -> Parsed {
        const RULE: &str = "for_loop";

        let Some(for_token) = self.accept_keyword(keyword::FOR) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::ForLoop, &for_token);
        let counter = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &counter));

        for clause in [keyword::FROM, keyword::TO, keyword::STEP] {
            if self.accept_keyword(clause).is_some() {
                node.add_child(self.require_expression(RULE)?);
            } else {
                node.add_child(AstNode::synthetic(NodeKind::EmptyExpression));
            }
        }

        node.add_child(self.parse_loop_body(RULE)?);
        Ok(Some(node))
    }

    /// Parses `while expr loop … end`.
    fn parse_while_loop(&mut self) -> Parsed {
        const RULE: &str = "while_loop";

        let Some(while_token) = self.accept_keyword(keyword::WHILE) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::WhileLoop, &while_token);
        node.add_child(self.require_expression(RULE)?);
        node.add_child(self.parse_loop_body(RULE)?);
        Ok(Some(node))
    }

    /// Parses a bodyless-condition infinite loop: `loop … end`.
    fn parse_infinite_loop(&mut self) -> Parsed {
        const RULE: &str = "infinite_loop";

        if !self
            .peek_token()
            .is_some_and(|t| t.is_keyword(keyword::LOOP))
        {
            return Ok(None);
        }

        let mut node = AstNode::synthetic(NodeKind::InfiniteLoop);
        node.add_child(self.parse_loop_body(RULE)?);
        Ok(Some(node))
    }

    /// Parses the `loop … end` body shared by all three loop forms.
    fn parse_loop_body(&mut self, rule: &'static str) -> Result<AstNode, SyntaxError> {
        let loop_token = self.expect_keyword(keyword::LOOP, rule)?;
        let mut node = AstNode::at_token(NodeKind::LoopBody, &loop_token);
        let body = self.all_children(&[Self::parse_var_declaration, Self::parse_statement])?;
        node.add_children(body);
        self.validate_block_end(&mut node, rule)?;
        Ok(node)
    }

    /// Parses `break;`.
    fn parse_break_statement(&mut self) -> Parsed {
        const RULE: &str = "break_statement";

        let Some(break_token) = self.accept_keyword(keyword::BREAK) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::BreakStatement, &break_token);
        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    /// Parses `goto label;`.
    fn parse_goto_statement(&mut self) -> Parsed {
        const RULE: &str = "goto_statement";

        let Some(goto_token) = self.accept_keyword(keyword::GOTO) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::GoToStatement, &goto_token);
        let target = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &target));
        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    // ========================================================================
    // Call, swap, assignment
    // ========================================================================

    /// Parses `name(args);` or `module.name(args);`.
    ///
    /// Returns no match until the `(` confirms the call form, so swap and
    /// assignment can retry the shared identifier prefix.
    fn parse_call_statement(&mut self) -> Parsed {
        const RULE: &str = "call_statement";

        let Some(first) = self.accept_identifier() else {
            return Ok(None);
        };

        let mut node = AstNode::synthetic(NodeKind::CallStatement);
        node.add_child(AstNode::from_token(NodeKind::Identifier, &first));

        if self.accept_delimiter(delimiter::DOT).is_some() {
            // `module.routine` — the dot commits the call form.
            let name = self.expect_identifier(RULE)?;
            node.add_child(AstNode::from_token(NodeKind::Identifier, &name));
            self.expect_delimiter(delimiter::PAREN_OPEN, RULE)?;
        } else if self.accept_delimiter(delimiter::PAREN_OPEN).is_none() {
            return Ok(None);
        }

        if self.accept_delimiter(delimiter::PAREN_CLOSE).is_none() {
            loop {
                node.add_child(self.require_expression(RULE)?);
                if self.accept_delimiter(delimiter::COMMA).is_none() {
                    break;
                }
            }
            self.expect_delimiter(delimiter::PAREN_CLOSE, RULE)?;
        }

        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    /// Parses `primary <=> primary;`.
    fn parse_swap_statement(&mut self) -> Parsed {
        const RULE: &str = "swap_statement";

        let Some(left) = self.parse_primary()? else {
            return Ok(None);
        };
        if self.accept_operator(operator::SWAP).is_none() {
            return Ok(None);
        }

        let mut node = AstNode::synthetic(NodeKind::SwapStatement);
        node.add_child(left);
        node.add_child(self.require_primary(RULE)?);
        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }

    /// Parses `primary := expr;`.
    fn parse_assignment_statement(&mut self) -> Parsed {
        const RULE: &str = "assignment_statement";

        let Some(target) = self.parse_primary()? else {
            return Ok(None);
        };
        if self.accept_operator(operator::ASSIGN).is_none() {
            return Ok(None);
        }

        let mut node = AstNode::synthetic(NodeKind::AssignmentStatement);
        node.add_child(target);
        node.add_child(self.require_expression(RULE)?);
        let semicolon = self.expect_delimiter(delimiter::SEMICOLON, RULE)?;
        node.propagate_token(&semicolon);
        Ok(Some(node))
    }
}
