//! Liminal register IR: lowering, validation, and interpretation.
//!
//! The IR is a flat list of instructions per function plus the program's
//! schema table. [`lower::lower`] translates a checked tree into it,
//! [`validate::validate`] checks label integrity, and [`exec::execute`]
//! runs the result against an oracle and a pair of streams.
//!
//! The lowering materializes the language's higher-level constructs:
//! `consult` becomes an explicit retry loop over hidden locals, `for` loops
//! become compare-and-step sequences, `case` arms become chained tests
//! (with `Ok`/`Err` constructor patterns unwrapping and binding), and
//! records/arrays flatten into dotted field-path names.

pub mod exec;
pub mod ir;
pub mod lower;
pub mod validate;

pub use exec::execute;
pub use ir::{Function, Instr, Opcode, Program, NO_SLOT};
pub use lower::lower;
pub use validate::validate;
