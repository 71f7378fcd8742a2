//! Parse error types for the Liminal parser.

use std::fmt;

use liminal_common::span::Span;

/// A parse error with location information.
///
/// Parse errors carry the span of the token where the problem was detected
/// and a human-readable message saying what was expected. The parser
/// accumulates errors and keeps going, so a single parse can report many.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Source location where the error was detected.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error from a message and span.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_new() {
        let err = ParseError::new("Expected expression", Span::new(5, 10));
        assert_eq!(err.message, "Expected expression");
        assert_eq!(err.span, Span::new(5, 10));
        assert_eq!(err.to_string(), "Expected expression");
    }
}
