//! Type error representation.

use std::fmt;

use liminal_common::span::Span;

/// A semantic error found during type checking.
///
/// Errors are accumulated, never thrown: the checker visits the whole
/// program and reports everything it finds, and the program is rejected if
/// any error is present.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    /// Human-readable description of the mismatch.
    pub message: String,
    /// Source location of the offending construct.
    pub span: Span,
}

impl TypeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TypeError {}
