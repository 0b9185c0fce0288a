// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source-highlighting diagnostics.
//!
//! Given an error with a [`Position`] and the original [`SourceBuffer`],
//! this module renders the only formatted output the front end produces
//! besides the raw AST: the offending source line framed by a fixed-width
//! border, with a dashes-then-carets underline pointing at the exact span.
//!
//! ```text
//! syntax error at 0:12: unexpected end of stream (while parsing parameter)
//! +------------------------------------------------+
//! | routine foo(
//! | ------------^
//! +------------------------------------------------+
//! ```

use crate::error::CompileError;
use crate::source_analysis::{Position, SourceBuffer};

/// Width of the frame drawn around highlighted source lines.
const FRAME_WIDTH: usize = 48;

/// Renders an error with source highlighting.
///
/// Errors without a position render as a bare heading; the highlight frame
/// is only attached when there is a span to point at.
#[must_use]
pub fn render(error: &CompileError, source: &SourceBuffer) -> String {
    match error.position() {
        Some(position) => format!(
            "{} at {}:{}: {}\n{}",
            error.category(),
            position.start.line,
            position.start.symbol,
            error,
            highlight(source, position),
        ),
        None => format!("{}: {}", error.category(), error),
    }
}

/// Renders the framed source excerpt with a caret underline at `position`.
///
/// Multi-line spans are pointed at from their first line, underlining from
/// the start column to the end of that line.
#[must_use]
pub fn highlight(source: &SourceBuffer, position: Position) -> String {
    let line = source.line(position.start.line);
    let underline = make_underline(
        position.start.symbol,
        position.length().unwrap_or_else(|| {
            line.chars()
                .count()
                .saturating_sub(position.start.symbol)
        }),
    );

    let border = format!("+{}+", "-".repeat(FRAME_WIDTH));
    format!("{border}\n| {line}\n| {underline}\n{border}")
}

/// Builds the `------^^^` underline: `offset` dashes, then at least one
/// caret.
fn make_underline(offset: usize, length: usize) -> String {
    let mut underline = "-".repeat(offset);
    underline.push_str(&"^".repeat(length.max(1)));
    underline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SyntaxError, TokenizationError};
    use crate::source_analysis::{Point, Token, TokenKind, normalize};

    #[test]
    fn underline_shape() {
        assert_eq!(make_underline(0, 3), "^^^");
        assert_eq!(make_underline(4, 2), "----^^");
        // Zero-length spans still get one caret.
        assert_eq!(make_underline(2, 0), "--^");
    }

    #[test]
    fn highlight_frames_the_offending_line() {
        let source = SourceBuffer::new(normalize("data FOO 1, x end"));
        let rendered = highlight(&source, Position::on_line(0, 12, 1));
        let border = format!("+{}+", "-".repeat(48));
        assert_eq!(
            rendered,
            format!("{border}\n| data FOO 1, x end\n| ------------^\n{border}")
        );
    }

    #[test]
    fn highlight_of_out_of_range_line_is_safe() {
        let source = SourceBuffer::new(normalize("short"));
        let rendered = highlight(&source, Position::on_line(9, 2, 1));
        assert!(rendered.contains("| \n"));
    }

    #[test]
    fn multi_line_span_underlines_to_end_of_first_line() {
        let source = SourceBuffer::new(normalize("module m\nend"));
        let position = Position::new(Point::new(0, 7), Point::new(1, 3));
        let rendered = highlight(&source, position);
        assert!(rendered.contains("| -------^"));
    }

    #[test]
    fn render_includes_category_position_and_message() {
        let source = SourceBuffer::new(normalize("x @ y"));
        let error =
            CompileError::from(TokenizationError::unknown_symbol("@", Position::on_line(0, 2, 1)));
        let rendered = render(&error, &source);
        assert!(rendered.starts_with("tokenization error at 0:2: unknown symbol `@`"));
        assert!(rendered.contains("| x @ y"));
        assert!(rendered.contains("| --^"));
    }

    #[test]
    fn render_without_position_is_heading_only() {
        let source = SourceBuffer::new(normalize(""));
        let token = Token::new(TokenKind::Keyword, "end", Position::on_line(0, 0, 3));
        let mut syntax = SyntaxError::invalid_token(&token, "program");
        syntax.position = None;
        let rendered = render(&CompileError::from(syntax), &source);
        assert_eq!(
            rendered,
            "syntax error: invalid token `end` encountered (while parsing program)"
        );
    }
}
