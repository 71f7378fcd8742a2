//! Liminal parser: recursive descent producing a rowan-based CST.
//!
//! This crate transforms the token stream from `liminal-lexer` into a
//! lossless concrete syntax tree using the `rowan` library, plus an ordered
//! list of parse errors. Errors never abort the parse: the parser records a
//! diagnostic, consumes the offending token, and keeps going, so callers
//! always get a (possibly partial) tree for every input.
//!
//! The [`ast`] module layers typed accessors over the CST; the type checker
//! and the IR lowering both navigate the tree through it.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use ast::item::Program;
use ast::AstNode;

/// Result of parsing a Liminal source file.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) and any
/// parse errors encountered, in source order.
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The typed program root.
    pub fn program(&self) -> Program {
        Program::cast(self.syntax()).expect("root node must be SOURCE_FILE")
    }

    /// Parse errors encountered during parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a Liminal source file into a CST.
///
/// This is the main entry point for the parser. It lexes the source,
/// parses the token stream, and returns a [`Parse`] result containing
/// the syntax tree and any errors.
pub fn parse(source: &str) -> Parse {
    let tokens = liminal_lexer::Lexer::tokenize(source);
    let mut parser = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut parser);
    let (green, errors) = parser.build_tree();
    Parse { green, errors }
}
