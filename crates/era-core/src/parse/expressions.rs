// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Era.
//!
//! Era expressions are deliberately flat: `operand (operator operand)?` —
//! binary only, one operator, no precedence climbing and no chaining. This
//! is a grammar restriction, not a parser shortcut; longer arithmetic is
//! written as a statement sequence over registers.
//!
//! Comparison operators (`=`, `/=`, `<`, `>`) and arithmetic/bitwise
//! operators (`+ - * & | ^`) are mutually exclusive sub-rules of the
//! expression operator, producing `CompOperator` and `ExpressionOperator`
//! nodes respectively.
//!
//! The operand/primary split matters for assignment targets:
//!
//! - **Operand** (expression side): receiver, `&name` reference, or literal
//! - **Primary** (target side): receiver, `*literal` explicit address, or
//!   `*register-or-name` dereference
//!
//! Array access must be tried before the bare identifier so `arr[i]` does
//! not get consumed as `arr`.

use crate::ast::{AstNode, NodeKind};
use crate::error::SyntaxError;
use crate::source_analysis::{Token, TokenKind, delimiter, operator};

use super::{Parsed, Parser};

/// Comparison operators, the `CompOperator` sub-rule.
const COMPARISON_OPERATORS: &[&str] = &[
    operator::EQUAL,
    operator::NOT_EQUAL,
    operator::LESS,
    operator::GREATER,
];

/// Arithmetic and bitwise operators, the plain `ExpressionOperator`
/// sub-rule.
const ARITHMETIC_OPERATORS: &[&str] = &[
    operator::PLUS,
    operator::MINUS,
    operator::ASTERISK,
    operator::AMPERSAND,
    operator::PIPE,
    operator::CARET,
];

impl Parser {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Parses `operand (operator operand)?` into an `Expression` node.
    pub(super) fn parse_expression(&mut self) -> Parsed {
        const RULE: &str = "expression";

        let Some(left) = self.parse_operand()? else {
            return Ok(None);
        };

        let mut node = AstNode::synthetic(NodeKind::Expression);
        node.add_child(left);

        if let Some(op) = self.parse_expression_operator()? {
            // The operator commits the binary form.
            node.add_child(op);
            node.add_child(self.require_operand(RULE)?);
        }

        Ok(Some(node))
    }

    /// Parses an expression, failing when none is present.
    pub(super) fn require_expression(&mut self, rule: &'static str) -> Result<AstNode, SyntaxError> {
        match self.parse_expression()? {
            Some(node) => Ok(node),
            None => Err(self.expectation_error("expression", rule)),
        }
    }

    /// Parses the single expression operator, trying the comparison
    /// sub-rule first and the arithmetic sub-rule second.
    fn parse_expression_operator(&mut self) -> Parsed {
        self.try_variants(&[Self::parse_comp_operator, Self::parse_arith_operator])
    }

    fn parse_comp_operator(&mut self) -> Parsed {
        Ok(self
            .accept_operator_of(COMPARISON_OPERATORS)
            .map(|token| AstNode::from_token(NodeKind::CompOperator, &token)))
    }

    fn parse_arith_operator(&mut self) -> Parsed {
        Ok(self
            .accept_operator_of(ARITHMETIC_OPERATORS)
            .map(|token| AstNode::from_token(NodeKind::ExpressionOperator, &token)))
    }

    // ========================================================================
    // Operands
    // ========================================================================

    /// Parses an expression-usable value: receiver, reference, or literal.
    pub(super) fn parse_operand(&mut self) -> Parsed {
        self.try_variants(&[
            Self::parse_receiver,
            Self::parse_reference,
            Self::parse_literal,
        ])
    }

    /// Parses an operand, failing when none is present.
    pub(super) fn require_operand(&mut self, rule: &'static str) -> Result<AstNode, SyntaxError> {
        match self.parse_operand()? {
            Some(node) => Ok(node),
            None => Err(self.expectation_error("operand", rule)),
        }
    }

    /// Parses an addressable operand: array access, identifier, or
    /// register. Array access first, so the identifier alternative cannot
    /// misconsume `arr` out of `arr[i]`.
    pub(super) fn parse_receiver(&mut self) -> Parsed {
        self.try_variants(&[
            Self::parse_array_access,
            Self::parse_identifier_operand,
            Self::parse_register_operand,
        ])
    }

    /// Parses `name[expr]`.
    fn parse_array_access(&mut self) -> Parsed {
        const RULE: &str = "array_access";

        let Some(name) = self.accept_identifier() else {
            return Ok(None);
        };
        if self.accept_delimiter(delimiter::BRACKET_OPEN).is_none() {
            return Ok(None);
        }

        // The bracket commits: `name[` must complete into an access.
        let mut node = AstNode::synthetic(NodeKind::ArrayAccess);
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));
        node.add_child(self.require_expression(RULE)?);
        let close = self.expect_delimiter(delimiter::BRACKET_CLOSE, RULE)?;
        node.propagate_token(&close);
        Ok(Some(node))
    }

    fn parse_identifier_operand(&mut self) -> Parsed {
        Ok(self
            .accept_identifier()
            .map(|token| AstNode::from_token(NodeKind::Identifier, &token)))
    }

    fn parse_register_operand(&mut self) -> Parsed {
        Ok(self
            .accept_register()
            .map(|token| AstNode::from_token(NodeKind::Register, &token)))
    }

    /// Parses a `&name` reference.
    fn parse_reference(&mut self) -> Parsed {
        const RULE: &str = "reference";

        let Some(ampersand) = self.accept_operator(operator::AMPERSAND) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Reference, &ampersand);
        let name = self.expect_identifier(RULE)?;
        node.add_child(AstNode::from_token(NodeKind::Identifier, &name));
        Ok(Some(node))
    }

    /// Parses a number literal.
    fn parse_literal(&mut self) -> Parsed {
        Ok(self
            .accept_number()
            .map(|token| AstNode::from_token(NodeKind::Literal, &token)))
    }

    // ========================================================================
    // Primaries — assignment and swap targets
    // ========================================================================

    /// Parses an assignment/swap target: receiver, explicit address, or
    /// dereference.
    pub(super) fn parse_primary(&mut self) -> Parsed {
        self.try_variants(&[
            Self::parse_receiver,
            Self::parse_explicit_address,
            Self::parse_dereference,
        ])
    }

    /// Parses a primary, failing when none is present.
    pub(super) fn require_primary(&mut self, rule: &'static str) -> Result<AstNode, SyntaxError> {
        match self.parse_primary()? {
            Some(node) => Ok(node),
            None => Err(self.expectation_error("primary", rule)),
        }
    }

    /// Parses `*literal` — a write to a literal memory address.
    fn parse_explicit_address(&mut self) -> Parsed {
        let Some(star) = self.accept_operator(operator::ASTERISK) else {
            return Ok(None);
        };
        let Some(address) = self.accept_number() else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::ExplicitAddress, &star);
        node.add_child(AstNode::from_token(NodeKind::Literal, &address));
        Ok(Some(node))
    }

    /// Parses `*register` or `*name` — an indirect target.
    fn parse_dereference(&mut self) -> Parsed {
        let Some(star) = self.accept_operator(operator::ASTERISK) else {
            return Ok(None);
        };

        let mut node = AstNode::at_token(NodeKind::Dereference, &star);
        if let Some(register) = self.accept_register() {
            node.add_child(AstNode::from_token(NodeKind::Register, &register));
        } else if let Some(name) = self.accept_identifier() {
            node.add_child(AstNode::from_token(NodeKind::Identifier, &name));
        } else {
            return Ok(None);
        }
        Ok(Some(node))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Consumes the next token if it is an operator in `set`.
    fn accept_operator_of(&mut self, set: &[&str]) -> Option<Token> {
        let token = self.peek_token()?;
        if token.kind() == TokenKind::Operator && set.contains(&token.text()) {
            self.next_token("operator").ok();
            Some(token)
        } else {
            None
        }
    }

    /// Builds the error for a missing required construct: end-of-stream if
    /// the tokens ran out, otherwise an unexpected-token mismatch.
    fn expectation_error(&mut self, expected: &'static str, rule: &'static str) -> SyntaxError {
        match self.next_token(rule) {
            Ok(token) => SyntaxError::unexpected_token(expected, &token, rule),
            Err(end_of_stream) => end_of_stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::error::SyntaxErrorKind;
    use crate::parse::tests::parse_text;

    /// Parses `code x := <expr>; end` and returns the expression node.
    fn parse_expr(expr: &str) -> crate::ast::AstNode {
        let root = parse_text(&format!("code x := {expr}; end")).unwrap();
        root.children()[0].children()[0].children()[1].clone()
    }

    #[test]
    fn single_operand_expression() {
        let expr = parse_expr("y");
        assert_eq!(expr.kind(), NodeKind::Expression);
        assert_eq!(expr.children().len(), 1);
        assert_eq!(expr.children()[0].kind(), NodeKind::Identifier);
    }

    #[test]
    fn binary_arithmetic_expression() {
        let expr = parse_expr("y + 1");
        let kinds: Vec<_> = expr.children().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Identifier,
                NodeKind::ExpressionOperator,
                NodeKind::Literal
            ]
        );
        assert_eq!(expr.children()[1].value(), "+");
    }

    #[test]
    fn comparison_produces_comp_operator_node() {
        let expr = parse_expr("y /= 0");
        assert_eq!(expr.children()[1].kind(), NodeKind::CompOperator);
        assert_eq!(expr.children()[1].value(), "/=");
    }

    #[test]
    fn bitwise_operators_are_expression_operators() {
        for op in ["&", "|", "^", "*", "-"] {
            let expr = parse_expr(&format!("R1 {op} R2"));
            assert_eq!(expr.children()[1].kind(), NodeKind::ExpressionOperator);
            assert_eq!(expr.children()[1].value(), op);
        }
    }

    #[test]
    fn no_operator_chaining() {
        // `a + b + c` is not a valid expression; the statement ends after
        // the first pair, so the trailing `+ c` breaks the `;` expectation.
        let err = parse_text("code x := a + b + c; end").unwrap_err();
        assert!(matches!(
            err.kind,
            SyntaxErrorKind::UnexpectedToken { ref expected, .. } if expected == ";"
        ));
    }

    #[test]
    fn reference_operand() {
        let expr = parse_expr("&table");
        let reference = &expr.children()[0];
        assert_eq!(reference.kind(), NodeKind::Reference);
        assert_eq!(reference.children()[0].value(), "table");
    }

    #[test]
    fn array_access_operand() {
        let expr = parse_expr("buf[i + 1]");
        let access = &expr.children()[0];
        assert_eq!(access.kind(), NodeKind::ArrayAccess);
        assert_eq!(access.children()[0].value(), "buf");
        assert_eq!(access.children()[1].kind(), NodeKind::Expression);
    }

    #[test]
    fn array_access_requires_closing_bracket() {
        let err = parse_text("code x := buf[1; end").unwrap_err();
        assert!(matches!(
            err.kind,
            SyntaxErrorKind::UnexpectedToken { ref expected, .. } if expected == "]"
        ));
        assert_eq!(err.rule, "array_access");
    }

    #[test]
    fn register_operand() {
        let expr = parse_expr("R7");
        assert_eq!(expr.children()[0].kind(), NodeKind::Register);
        assert_eq!(expr.children()[0].value(), "R7");
    }

    #[test]
    fn explicit_address_target() {
        let root = parse_text("code *100 := R1; end").unwrap();
        let assignment = &root.children()[0].children()[0];
        let target = &assignment.children()[0];
        assert_eq!(target.kind(), NodeKind::ExplicitAddress);
        assert_eq!(target.children()[0].value(), "100");
    }

    #[test]
    fn dereference_target() {
        let root = parse_text("code *ptr := 0; end").unwrap();
        let target = &root.children()[0].children()[0].children()[0];
        assert_eq!(target.kind(), NodeKind::Dereference);
        assert_eq!(target.children()[0].kind(), NodeKind::Identifier);
    }

    #[test]
    fn missing_operand_after_operator_is_fatal() {
        let err = parse_text("code x := y + ; end").unwrap_err();
        assert!(matches!(
            err.kind,
            SyntaxErrorKind::UnexpectedToken { ref expected, .. } if expected == "operand"
        ));
        assert_eq!(err.rule, "expression");
    }

    #[test]
    fn reference_requires_identifier() {
        let err = parse_text("code x := &5; end").unwrap_err();
        assert!(matches!(err.kind, SyntaxErrorKind::IdentifierExpected { .. }));
        assert_eq!(err.rule, "reference");
    }
}
