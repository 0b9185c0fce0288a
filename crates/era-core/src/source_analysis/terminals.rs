// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The fixed terminal vocabulary of Era.
//!
//! Terminals are the exact strings the lexer resolves by greedy
//! longest-match: delimiters, operators and keywords. Identifiers, numbers
//! and registers are recognized by character class instead and always win
//! over a shorter terminal match (`form` is an identifier, never the
//! keyword `for`).

/// Delimiter terminals.
pub mod delimiter {
    pub const COLON: &str = ":";
    pub const SEMICOLON: &str = ";";
    pub const COMMA: &str = ",";
    pub const DOT: &str = ".";
    pub const PAREN_OPEN: &str = "(";
    pub const PAREN_CLOSE: &str = ")";
    pub const BRACKET_OPEN: &str = "[";
    pub const BRACKET_CLOSE: &str = "]";
}

/// Operator terminals.
///
/// The `<=`, `>=` and `?=` forms are assembly assignment operators, not
/// comparisons — Era's comparison set is `=`, `/=`, `<`, `>`.
pub mod operator {
    pub const PLUS: &str = "+";
    pub const MINUS: &str = "-";
    /// Multiply, or the dereference/explicit-address marker.
    pub const ASTERISK: &str = "*";
    /// Bitwise and, or the reference marker.
    pub const AMPERSAND: &str = "&";
    pub const PIPE: &str = "|";
    pub const CARET: &str = "^";
    pub const QUESTION: &str = "?";

    pub const EQUAL: &str = "=";
    pub const LESS: &str = "<";
    pub const GREATER: &str = ">";
    pub const NOT_EQUAL: &str = "/=";

    pub const ASSIGN: &str = ":=";
    pub const ASSIGN_PLUS: &str = "+=";
    pub const ASSIGN_MINUS: &str = "-=";
    pub const ASSIGN_SHIFT_RIGHT: &str = ">>=";
    pub const ASSIGN_SHIFT_LEFT: &str = "<<=";
    pub const ASSIGN_OR: &str = "|=";
    pub const ASSIGN_AND: &str = "&=";
    pub const ASSIGN_XOR: &str = "^=";
    pub const ASSIGN_LESS: &str = "<=";
    pub const ASSIGN_GREATER: &str = ">=";
    pub const ASSIGN_COND: &str = "?=";
    pub const SWAP: &str = "<=>";
}

/// Keyword terminals.
pub mod keyword {
    pub const PRAGMA: &str = "pragma";
    pub const MODULE: &str = "module";
    pub const DATA: &str = "data";
    pub const CODE: &str = "code";
    pub const ASM: &str = "asm";

    pub const ROUTINE: &str = "routine";
    pub const START: &str = "start";
    pub const ENTRY: &str = "entry";

    pub const IF: &str = "if";
    pub const ELSE: &str = "else";
    pub const ELIF: &str = "elif";

    pub const DO: &str = "do";
    pub const END: &str = "end";

    pub const CONST: &str = "const";
    pub const INT: &str = "int";
    pub const SHORT: &str = "short";
    pub const BYTE: &str = "byte";

    pub const FORMAT: &str = "format";
    pub const SKIP: &str = "skip";
    pub const STOP: &str = "stop";

    pub const FOR: &str = "for";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const STEP: &str = "step";
    pub const WHILE: &str = "while";
    pub const LOOP: &str = "loop";
    pub const BREAK: &str = "break";

    pub const GOTO: &str = "goto";
}

/// The line comment opener. Not a terminal proper: `//` switches the lexer
/// into comment mode instead of producing a delimiter/operator/keyword.
pub const LINE_COMMENT: &str = "//";

pub(crate) const DELIMITERS: &[&str] = &[
    delimiter::COLON,
    delimiter::SEMICOLON,
    delimiter::COMMA,
    delimiter::DOT,
    delimiter::PAREN_OPEN,
    delimiter::PAREN_CLOSE,
    delimiter::BRACKET_OPEN,
    delimiter::BRACKET_CLOSE,
];

pub(crate) const OPERATORS: &[&str] = &[
    operator::PLUS,
    operator::MINUS,
    operator::ASTERISK,
    operator::AMPERSAND,
    operator::PIPE,
    operator::CARET,
    operator::QUESTION,
    operator::EQUAL,
    operator::LESS,
    operator::GREATER,
    operator::NOT_EQUAL,
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
    operator::SWAP,
];

pub(crate) const KEYWORDS: &[&str] = &[
    keyword::PRAGMA,
    keyword::MODULE,
    keyword::DATA,
    keyword::CODE,
    keyword::ASM,
    keyword::ROUTINE,
    keyword::START,
    keyword::ENTRY,
    keyword::IF,
    keyword::ELSE,
    keyword::ELIF,
    keyword::DO,
    keyword::END,
    keyword::CONST,
    keyword::INT,
    keyword::SHORT,
    keyword::BYTE,
    keyword::FORMAT,
    keyword::SKIP,
    keyword::STOP,
    keyword::FOR,
    keyword::FROM,
    keyword::TO,
    keyword::STEP,
    keyword::WHILE,
    keyword::LOOP,
    keyword::BREAK,
    keyword::GOTO,
];

/// Returns `true` if `text` is exactly a delimiter terminal.
pub(crate) fn is_delimiter(text: &str) -> bool {
    DELIMITERS.contains(&text)
}

/// Returns `true` if `text` is exactly an operator terminal.
pub(crate) fn is_operator(text: &str) -> bool {
    OPERATORS.contains(&text)
}

/// Returns `true` if `text` is exactly a keyword terminal.
pub(crate) fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Returns `true` if some terminal starts with `text`.
///
/// This is the lexer's greedy-extension test: while the accumulated
/// candidate is still a prefix of a longer terminal (or the comment
/// opener), the lexer keeps consuming. Prefix matching — not set
/// membership — is what lets multi-character operators like `>>=` resolve
/// even though `>>` alone is not a terminal.
pub(crate) fn is_terminal_prefix(text: &str) -> bool {
    DELIMITERS
        .iter()
        .chain(OPERATORS)
        .chain(KEYWORDS)
        .any(|t| t.starts_with(text))
        || LINE_COMMENT.starts_with(text)
}

/// Returns `true` if `text` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns `true` if `text` matches `[+-]?\d+`.
pub(crate) fn is_number(text: &str) -> bool {
    let digits = text
        .strip_prefix(['+', '-'])
        .unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Returns `true` if `text` names a register: `R0` through `R31`, no
/// leading zeros.
pub(crate) fn is_register(text: &str) -> bool {
    let Some(digits) = text.strip_prefix('R') else {
        return false;
    };
    match digits.len() {
        1 => digits.chars().all(|c| c.is_ascii_digit()),
        2 => {
            !digits.starts_with('0')
                && digits.chars().all(|c| c.is_ascii_digit())
                && digits.parse::<u8>().is_ok_and(|n| n <= 31)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_disjoint() {
        assert!(is_delimiter(";"));
        assert!(!is_operator(";"));
        assert!(is_operator("<=>"));
        assert!(is_keyword("routine"));
        assert!(!is_keyword("routines"));
    }

    #[test]
    fn prefix_extension_covers_long_operators() {
        // `>>` is not a terminal but must still extend towards `>>=`.
        assert!(is_terminal_prefix(">"));
        assert!(is_terminal_prefix(">>"));
        assert!(is_terminal_prefix(">>="));
        assert!(!is_terminal_prefix(">>>"));
        assert!(is_terminal_prefix("<="));
        assert!(is_terminal_prefix("<=>"));
    }

    #[test]
    fn prefix_extension_covers_keywords_and_comment() {
        assert!(is_terminal_prefix("rout"));
        assert!(!is_terminal_prefix("routx"));
        assert!(is_terminal_prefix("/"));
        assert!(is_terminal_prefix("//"));
    }

    #[test]
    fn identifier_classification() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("R5x"));
        assert!(!is_identifier("1foo"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn number_classification() {
        assert!(is_number("0"));
        assert!(is_number("+42"));
        assert!(is_number("-7"));
        assert!(!is_number("+"));
        assert!(!is_number("4x"));
    }

    #[test]
    fn register_classification() {
        assert!(is_register("R0"));
        assert!(is_register("R9"));
        assert!(is_register("R10"));
        assert!(is_register("R31"));
        assert!(!is_register("R32"));
        assert!(!is_register("R01"));
        assert!(!is_register("R"));
        assert!(!is_register("r5"));
    }
}
