//! Symbol table with scope stack.
//!
//! Maps names to symbols (variables, functions, named types). Uses a scope
//! stack (Vec of hash maps) so that entering a function body pushes a new
//! frame and leaving pops it. Lookups search from the innermost scope
//! outward.

use rustc_hash::FxHashMap;

use crate::ty::Ty;

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Func,
    Type,
}

/// A resolved symbol: its kind plus its type (for functions, the declared
/// result type; for named types, the aliased semantic type).
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub ty: Ty,
}

/// A symbol table: a stack of scopes mapping names to symbols.
pub struct SymbolTable {
    /// The scope stack. Index 0 is the outermost (global) scope.
    scopes: Vec<FxHashMap<String, Symbol>>,
}

impl SymbolTable {
    /// Create a new symbol table with one empty global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Push a new empty scope onto the stack.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the top scope from the stack.
    ///
    /// # Panics
    ///
    /// Panics if called when only the global scope remains.
    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the global scope");
        self.scopes.pop();
    }

    /// Define a name in the current (topmost) scope.
    pub fn define(&mut self, kind: SymbolKind, name: impl Into<String>, ty: Ty) {
        self.scopes
            .last_mut()
            .expect("scope stack should never be empty")
            .insert(name.into(), Symbol { kind, ty });
    }

    /// Look up a name, searching from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some(sym) = scope.get(name) {
                return Some(sym);
            }
        }
        None
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
