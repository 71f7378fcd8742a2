//! Typed AST nodes for top-level declarations: the program root, sections,
//! variable and type declarations, and functions.

use crate::ast::expr::Expr;
use crate::ast::stmt::Block;
use crate::ast::ty::Type;
use crate::ast::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Program root ─────────────────────────────────────────────────────────

ast_node!(Program, SOURCE_FILE);

impl Program {
    /// The program's declared name.
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    /// `uses` clauses, in source order.
    pub fn use_clauses(&self) -> impl Iterator<Item = UseClause> + '_ {
        child_nodes(&self.syntax)
    }

    /// `config` section items, in source order.
    pub fn config_items(&self) -> impl Iterator<Item = ConfigItem> + '_ {
        child_nodes(&self.syntax)
    }

    /// Named type and schema declarations, in source order.
    pub fn type_decls(&self) -> impl Iterator<Item = TypeDecl> + '_ {
        child_nodes(&self.syntax)
    }

    /// Oracle declarations, in source order.
    pub fn oracle_decls(&self) -> impl Iterator<Item = OracleDecl> + '_ {
        child_nodes(&self.syntax)
    }

    /// Global variable declaration groups, in source order.
    pub fn var_decls(&self) -> impl Iterator<Item = VarDecl> + '_ {
        child_nodes(&self.syntax)
    }

    /// Function declarations, in source order.
    pub fn functions(&self) -> impl Iterator<Item = FuncDecl> + '_ {
        child_nodes(&self.syntax)
    }

    /// The main `begin ... end.` body.
    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── Names ────────────────────────────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        child_token(&self.syntax, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

// ── Section items ────────────────────────────────────────────────────────

ast_node!(UseClause, USE_CLAUSE);

ast_node!(ConfigItem, CONFIG_ITEM);

impl ConfigItem {
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(TypeDecl, TYPE_DECL);

impl TypeDecl {
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    /// The declared type. Schema declarations carry a `SCHEMA_TYPE` here.
    pub fn ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }
}

ast_node!(OracleDecl, ORACLE_DECL);

impl OracleDecl {
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }

    /// The provider string token (still quoted).
    pub fn provider(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::STRING_LITERAL | SyntaxKind::CHAR_LITERAL
                )
            })
    }
}

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    /// All names declared by this group (`a, b: Integer;` declares two).
    pub fn names(&self) -> Vec<String> {
        child_nodes::<Name>(&self.syntax)
            .filter_map(|n| n.text())
            .collect()
    }

    pub fn ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }

    /// The initializer expression, if present.
    pub fn init(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Functions ────────────────────────────────────────────────────────────

ast_node!(FuncDecl, FUNC_DECL);

impl FuncDecl {
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    /// The declared result type (the first type node that is a direct child
    /// of the declaration; parameter types live inside the param list).
    pub fn result_ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }

    /// The optional `var` block of locals.
    pub fn var_block(&self) -> Option<VarBlock> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }

    /// Flattened parameter names, in declaration order.
    pub fn param_names(&self) -> Vec<String> {
        self.param_list()
            .map(|pl| {
                pl.params()
                    .flat_map(|param| param.names())
                    .collect()
            })
            .unwrap_or_default()
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    /// All names in this group (`a, b: Integer` declares two).
    pub fn names(&self) -> Vec<String> {
        child_nodes::<Name>(&self.syntax)
            .filter_map(|n| n.text())
            .collect()
    }

    pub fn ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }
}

ast_node!(VarBlock, VAR_BLOCK);

impl VarBlock {
    pub fn var_decls(&self) -> impl Iterator<Item = VarDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

// ── Fields (record/schema declarations) ──────────────────────────────────

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }

    /// The `describe '...'` annotation text token, if present. Pattern
    /// strings live inside the field's type node, so any string token that
    /// is a direct child here is the description.
    pub fn describe(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::STRING_LITERAL | SyntaxKind::CHAR_LITERAL
                )
            })
    }
}
