// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree definitions for Era.
//!
//! Every node is an [`AstNode`]: a [`NodeKind`] tag, a value string (the
//! token lexeme, or empty for synthetic nodes), an optional [`Position`],
//! and an ordered list of owned children. Ownership is strictly tree-shaped
//! — there are no parent back-references, since no grammar rule traverses
//! upward.
//!
//! # Position propagation
//!
//! Attaching a child widens the parent's position to the union of its own
//! span and the child's. A node's position is therefore monotonically
//! non-shrinking and always covers every attached child.
//!
//! # Debug dumps
//!
//! [`AstNode::to_debug_string`] produces the deterministic nested-
//! indentation dump the test fixtures are written against:
//!
//! ```text
//! Data: {
//!   Identifier(FOO)
//!   Literal(1)
//! }
//! ```

use ecow::EcoString;

use crate::error::SemanticError;
use crate::source_analysis::{Position, Token};

/// The closed set of AST node variants.
///
/// The grammar is fixed, so node construction goes through ordinary
/// factory calls on [`AstNode`] — one variant per grammar symbol, no
/// dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Annotation,
    PragmaDeclaration,
    PragmaText,
    Data,
    Module,
    Code,
    Routine,
    RoutineAttribute,
    Parameters,
    Parameter,
    Results,
    RoutineBody,
    Variable,
    VarType,
    VarDefinition,
    Constant,
    ConstDefinition,
    Statement,
    Label,
    AssemblyBlock,
    AssemblyMetaOperation,
    AssemblyOperation,
    AssemblyOperationFormat,
    AssemblyCondition,
    IfStatement,
    BlockBody,
    ForLoop,
    WhileLoop,
    InfiniteLoop,
    LoopBody,
    BreakStatement,
    GoToStatement,
    CallStatement,
    SwapStatement,
    AssignmentStatement,
    Expression,
    EmptyExpression,
    ExpressionOperator,
    CompOperator,
    ArrayAccess,
    Reference,
    Dereference,
    ExplicitAddress,
    Literal,
    Identifier,
    Register,
}

impl NodeKind {
    /// Returns the variant name used in debug dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::Annotation => "Annotation",
            Self::PragmaDeclaration => "PragmaDeclaration",
            Self::PragmaText => "PragmaText",
            Self::Data => "Data",
            Self::Module => "Module",
            Self::Code => "Code",
            Self::Routine => "Routine",
            Self::RoutineAttribute => "RoutineAttribute",
            Self::Parameters => "Parameters",
            Self::Parameter => "Parameter",
            Self::Results => "Results",
            Self::RoutineBody => "RoutineBody",
            Self::Variable => "Variable",
            Self::VarType => "VarType",
            Self::VarDefinition => "VarDefinition",
            Self::Constant => "Constant",
            Self::ConstDefinition => "ConstDefinition",
            Self::Statement => "Statement",
            Self::Label => "Label",
            Self::AssemblyBlock => "AssemblyBlock",
            Self::AssemblyMetaOperation => "AssemblyMetaOperation",
            Self::AssemblyOperation => "AssemblyOperation",
            Self::AssemblyOperationFormat => "AssemblyOperationFormat",
            Self::AssemblyCondition => "AssemblyCondition",
            Self::IfStatement => "IfStatement",
            Self::BlockBody => "BlockBody",
            Self::ForLoop => "ForLoop",
            Self::WhileLoop => "WhileLoop",
            Self::InfiniteLoop => "InfiniteLoop",
            Self::LoopBody => "LoopBody",
            Self::BreakStatement => "BreakStatement",
            Self::GoToStatement => "GoToStatement",
            Self::CallStatement => "CallStatement",
            Self::SwapStatement => "SwapStatement",
            Self::AssignmentStatement => "AssignmentStatement",
            Self::Expression => "Expression",
            Self::EmptyExpression => "EmptyExpression",
            Self::ExpressionOperator => "ExpressionOperator",
            Self::CompOperator => "CompOperator",
            Self::ArrayAccess => "ArrayAccess",
            Self::Reference => "Reference",
            Self::Dereference => "Dereference",
            Self::ExplicitAddress => "ExplicitAddress",
            Self::Literal => "Literal",
            Self::Identifier => "Identifier",
            Self::Register => "Register",
        }
    }
}

/// A node of the Era AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    kind: NodeKind,
    value: EcoString,
    position: Option<Position>,
    children: Vec<AstNode>,
}

impl AstNode {
    /// Creates a node carrying a token's text and position.
    #[must_use]
    pub fn from_token(kind: NodeKind, token: &Token) -> Self {
        Self {
            kind,
            value: token.text().into(),
            position: Some(token.position()),
            children: Vec::new(),
        }
    }

    /// Creates a node that takes only its position from a token; the value
    /// stays empty. Used for structural nodes introduced by a keyword,
    /// like an assembly block or a reference marker.
    #[must_use]
    pub fn at_token(kind: NodeKind, token: &Token) -> Self {
        Self {
            kind,
            value: EcoString::new(),
            position: Some(token.position()),
            children: Vec::new(),
        }
    }

    /// Creates a synthetic node with no value or position; both are built
    /// up purely from attached children.
    #[must_use]
    pub fn synthetic(kind: NodeKind) -> Self {
        Self {
            kind,
            value: EcoString::new(),
            position: None,
            children: Vec::new(),
        }
    }

    /// Creates a node with an explicit value and no position.
    #[must_use]
    pub fn with_value(kind: NodeKind, value: impl Into<EcoString>) -> Self {
        Self {
            kind,
            value: value.into(),
            position: None,
            children: Vec::new(),
        }
    }

    /// Returns the node variant.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Replaces the node value.
    ///
    /// Used by rules that discover a marker after construction, like a
    /// variable definition turning out to be an array definition.
    pub fn set_value(&mut self, value: impl Into<EcoString>) {
        self.value = value.into();
    }

    /// Returns the node value (token lexeme or synthetic text).
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the node's source range, if any.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Returns the attached children in order.
    #[must_use]
    pub fn children(&self) -> &[AstNode] {
        &self.children
    }

    /// Appends a child and widens this node's position to cover it.
    pub fn add_child(&mut self, child: AstNode) {
        if let Some(child_position) = child.position {
            self.propagate_position(child_position);
        }
        self.children.push(child);
    }

    /// Appends every node in `children` in order.
    pub fn add_children(&mut self, children: impl IntoIterator<Item = AstNode>) {
        for child in children {
            self.add_child(child);
        }
    }

    /// Widens this node's position to cover `position`.
    pub fn propagate_position(&mut self, position: Position) {
        self.position = Some(match self.position {
            Some(own) => own.merge(position),
            None => position,
        });
    }

    /// Widens this node's position to cover a token, used when a closing
    /// terminal (`end`, `;`) belongs to the node but produces no child.
    pub fn propagate_token(&mut self, token: &Token) {
        self.propagate_position(token.position());
    }

    /// Converts a `Literal` node's value to its numeric form.
    ///
    /// Returns `None` for non-literal nodes or out-of-range text. The
    /// lexer guarantees literal text matches `[+-]?\d+`, so in-range
    /// conversion cannot fail after a successful parse.
    #[must_use]
    pub fn numeric_value(&self) -> Option<i64> {
        (self.kind == NodeKind::Literal)
            .then(|| self.value.parse().ok())
            .flatten()
    }

    /// Renders the node in the fixture dump format.
    ///
    /// `Name` or `Name(value)` per node, children wrapped in `: {` … `}`
    /// and indented two spaces per nesting level, each child line
    /// newline-terminated before the closing brace.
    #[must_use]
    pub fn to_debug_string(&self) -> String {
        let mut name = self.kind.name().to_string();
        if !self.value.is_empty() && name != self.value {
            name.push('(');
            name.push_str(&self.value);
            name.push(')');
        }

        if self.children.is_empty() {
            return name;
        }

        let mut rendered = name;
        rendered.push_str(": {\n");
        for child in &self.children {
            for line in child.to_debug_string().lines() {
                rendered.push_str("  ");
                rendered.push_str(line);
                rendered.push('\n');
            }
        }
        rendered.push('}');
        rendered
    }
}

/// A parsed program, assembled from the root node's top-level units.
///
/// Assembly is the only place the current front end raises a semantic
/// error: a program may contain at most one `code` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// `pragma` annotations, in source order.
    pub annotations: Vec<AstNode>,
    /// `data` tables, in source order.
    pub data: Vec<AstNode>,
    /// `module` declarations, in source order.
    pub modules: Vec<AstNode>,
    /// Top-level routines, in source order.
    pub routines: Vec<AstNode>,
    /// The single `code` block, if any.
    pub code: Option<AstNode>,
    /// The full source range of the program.
    pub position: Option<Position>,
}

impl Program {
    /// Partitions a root `Program` node into typed unit lists.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticError`] if a second `code` block is present.
    pub fn from_root(root: AstNode) -> Result<Self, SemanticError> {
        let position = root.position;
        let mut program = Self {
            annotations: Vec::new(),
            data: Vec::new(),
            modules: Vec::new(),
            routines: Vec::new(),
            code: None,
            position,
        };

        for child in root.children {
            match child.kind {
                NodeKind::Annotation => program.annotations.push(child),
                NodeKind::Data => program.data.push(child),
                NodeKind::Module => program.modules.push(child),
                NodeKind::Routine => program.routines.push(child),
                NodeKind::Code => {
                    if program.code.is_some() {
                        return Err(SemanticError::duplicate_code_block(child.position));
                    }
                    program.code = Some(child);
                }
                _ => unreachable!("parser only attaches top-level units to the program root"),
            }
        }

        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::TokenKind;

    fn token(kind: TokenKind, text: &str, line: usize, symbol: usize) -> Token {
        Token::new(kind, text, Position::on_line(line, symbol, text.len()))
    }

    #[test]
    fn from_token_takes_value_and_position() {
        let t = token(TokenKind::Identifier, "FOO", 0, 5);
        let node = AstNode::from_token(NodeKind::Identifier, &t);
        assert_eq!(node.value(), "FOO");
        assert_eq!(node.position(), Some(Position::on_line(0, 5, 3)));
    }

    #[test]
    fn add_child_propagates_position_union() {
        let mut parent = AstNode::synthetic(NodeKind::Data);
        assert_eq!(parent.position(), None);

        let a = token(TokenKind::Identifier, "FOO", 0, 5);
        parent.add_child(AstNode::from_token(NodeKind::Identifier, &a));
        assert_eq!(parent.position(), Some(Position::on_line(0, 5, 3)));

        let b = token(TokenKind::Number, "1", 2, 0);
        parent.add_child(AstNode::from_token(NodeKind::Literal, &b));
        let merged = parent.position().unwrap();
        assert_eq!(merged.start, Position::on_line(0, 5, 3).start);
        assert_eq!(merged.end, Position::on_line(2, 0, 1).end);
    }

    #[test]
    fn position_never_shrinks() {
        let mut parent = AstNode::synthetic(NodeKind::Expression);
        let wide = token(TokenKind::Identifier, "abcdef", 0, 0);
        let narrow = token(TokenKind::Number, "1", 0, 2);
        parent.add_child(AstNode::from_token(NodeKind::Identifier, &wide));
        let before = parent.position().unwrap();
        parent.add_child(AstNode::from_token(NodeKind::Literal, &narrow));
        assert_eq!(parent.position(), Some(before));
    }

    #[test]
    fn numeric_value_conversion() {
        let t = token(TokenKind::Number, "-42", 0, 0);
        let node = AstNode::from_token(NodeKind::Literal, &t);
        assert_eq!(node.numeric_value(), Some(-42));

        let id = AstNode::from_token(NodeKind::Identifier, &token(TokenKind::Identifier, "x", 0, 0));
        assert_eq!(id.numeric_value(), None);
    }

    #[test]
    fn debug_dump_leaf() {
        let node = AstNode::from_token(
            NodeKind::Identifier,
            &token(TokenKind::Identifier, "FOO", 0, 0),
        );
        assert_eq!(node.to_debug_string(), "Identifier(FOO)");
    }

    #[test]
    fn debug_dump_skips_value_equal_to_name() {
        let mut node = AstNode::synthetic(NodeKind::Program);
        assert_eq!(node.to_debug_string(), "Program");
        node.value = "Program".into();
        assert_eq!(node.to_debug_string(), "Program");
    }

    #[test]
    fn debug_dump_nested_indentation() {
        let mut data = AstNode::synthetic(NodeKind::Data);
        data.add_child(AstNode::from_token(
            NodeKind::Identifier,
            &token(TokenKind::Identifier, "FOO", 0, 5),
        ));
        data.add_child(AstNode::from_token(
            NodeKind::Literal,
            &token(TokenKind::Number, "1", 0, 9),
        ));

        let mut root = AstNode::synthetic(NodeKind::Program);
        root.add_child(data);

        assert_eq!(
            root.to_debug_string(),
            "Program: {\n  Data: {\n    Identifier(FOO)\n    Literal(1)\n  }\n}"
        );
    }

    #[test]
    fn program_assembly_partitions_units() {
        let mut root = AstNode::synthetic(NodeKind::Program);
        root.add_child(AstNode::synthetic(NodeKind::Annotation));
        root.add_child(AstNode::synthetic(NodeKind::Data));
        root.add_child(AstNode::synthetic(NodeKind::Routine));
        root.add_child(AstNode::synthetic(NodeKind::Code));

        let program = Program::from_root(root).unwrap();
        assert_eq!(program.annotations.len(), 1);
        assert_eq!(program.data.len(), 1);
        assert_eq!(program.routines.len(), 1);
        assert!(program.modules.is_empty());
        assert!(program.code.is_some());
    }

    #[test]
    fn duplicate_code_block_is_semantic_error() {
        let mut root = AstNode::synthetic(NodeKind::Program);
        root.add_child(AstNode::synthetic(NodeKind::Code));
        root.add_child(AstNode::synthetic(NodeKind::Code));

        let err = Program::from_root(root).unwrap_err();
        assert_eq!(
            err.to_string(),
            "program defines more than one code block"
        );
    }
}
