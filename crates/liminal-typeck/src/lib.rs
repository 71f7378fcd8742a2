//! Liminal type checker.
//!
//! Builds semantic types from the parsed tree, resolves named types, checks
//! statements and expressions against the language's typing rules, and
//! collects every error it finds (checking never aborts). Schema
//! declarations are gathered into a [`ty::SchemaTable`] that outlives the
//! check: lowering hands it to the IR, whose `ask` instructions validate
//! oracle output against it.
//!
//! # Architecture
//!
//! - [`ty`]: semantic type representation and the schema table
//! - [`env`]: symbol table with scope stack
//! - [`check`]: declaration passes and body checking
//! - [`schema_json`]: JSON Schema emission for declared schemas
//! - [`error`] / [`diagnostics`]: collected errors and ariadne rendering

mod check;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod schema_json;
pub mod ty;

pub use error::TypeError;

use ty::SchemaTable;

/// The result of type checking a Liminal program.
pub struct TypeckResult {
    /// Type errors found during checking, in discovery order.
    pub errors: Vec<TypeError>,
    /// Schemas declared by the program, in declaration order.
    pub schemas: SchemaTable,
}

impl TypeckResult {
    /// Whether the program passed the checker.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render all errors as formatted diagnostic strings.
    pub fn render_errors(&self, source: &str, filename: &str) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| diagnostics::render_diagnostic(err, source, filename))
            .collect()
    }
}

/// Type-check a parsed Liminal program.
///
/// This is the main entry point for the checker. It walks the tree, resolves
/// identifiers, checks every statement and expression, and reports all
/// errors it finds.
pub fn check(parse: &liminal_parser::Parse) -> TypeckResult {
    check::Checker::run(parse)
}
