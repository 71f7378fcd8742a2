//! Typed AST nodes for expressions.

use crate::ast::item::Name;
use crate::ast::ty::Type;
use crate::ast::{ast_node, child_node, child_nodes, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Any expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    Paren(ParenExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Index(IndexExpr),
    Field(FieldAccess),
    Tuple(TupleExpr),
    Array(ArrayExpr),
    Record(RecordExpr),
    FString(StringExpr),
    Ask(AskExpr),
    Consult(ConsultExpr),
    Embed(EmbedExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Expr::Literal(Literal { syntax: node })),
            SyntaxKind::NAME_REF => Some(Expr::NameRef(NameRef { syntax: node })),
            SyntaxKind::PAREN_EXPR => Some(Expr::Paren(ParenExpr { syntax: node })),
            SyntaxKind::UNARY_EXPR => Some(Expr::Unary(UnaryExpr { syntax: node })),
            SyntaxKind::BINARY_EXPR => Some(Expr::Binary(BinaryExpr { syntax: node })),
            SyntaxKind::CALL_EXPR => Some(Expr::Call(CallExpr { syntax: node })),
            SyntaxKind::INDEX_EXPR => Some(Expr::Index(IndexExpr { syntax: node })),
            SyntaxKind::FIELD_ACCESS => Some(Expr::Field(FieldAccess { syntax: node })),
            SyntaxKind::TUPLE_EXPR => Some(Expr::Tuple(TupleExpr { syntax: node })),
            SyntaxKind::ARRAY_EXPR => Some(Expr::Array(ArrayExpr { syntax: node })),
            SyntaxKind::RECORD_EXPR => Some(Expr::Record(RecordExpr { syntax: node })),
            SyntaxKind::STRING_EXPR => Some(Expr::FString(StringExpr { syntax: node })),
            SyntaxKind::ASK_EXPR => Some(Expr::Ask(AskExpr { syntax: node })),
            SyntaxKind::CONSULT_EXPR => Some(Expr::Consult(ConsultExpr { syntax: node })),
            SyntaxKind::EMBED_EXPR => Some(Expr::Embed(EmbedExpr { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => &n.syntax,
            Expr::NameRef(n) => &n.syntax,
            Expr::Paren(n) => &n.syntax,
            Expr::Unary(n) => &n.syntax,
            Expr::Binary(n) => &n.syntax,
            Expr::Call(n) => &n.syntax,
            Expr::Index(n) => &n.syntax,
            Expr::Field(n) => &n.syntax,
            Expr::Tuple(n) => &n.syntax,
            Expr::Array(n) => &n.syntax,
            Expr::Record(n) => &n.syntax,
            Expr::FString(n) => &n.syntax,
            Expr::Ask(n) => &n.syntax,
            Expr::Consult(n) => &n.syntax,
            Expr::Embed(n) => &n.syntax,
        }
    }
}

// ── Literal ──────────────────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

impl Literal {
    /// The literal's token (INT_LITERAL, STRING_LITERAL, TRUE_KW, ...).
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }
}

// ── Name Reference ───────────────────────────────────────────────────────

ast_node!(NameRef, NAME_REF);

impl NameRef {
    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
    }
}

// ── Parenthesized ────────────────────────────────────────────────────────

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Unary / binary ───────────────────────────────────────────────────────

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    /// The operator token (`-` or `not`).
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::MINUS | SyntaxKind::NOT_KW))
    }

    pub fn operand(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    /// The operator token.
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::PLUS
                        | SyntaxKind::MINUS
                        | SyntaxKind::STAR
                        | SyntaxKind::SLASH
                        | SyntaxKind::DIV_KW
                        | SyntaxKind::MOD_KW
                        | SyntaxKind::EQ
                        | SyntaxKind::NEQ
                        | SyntaxKind::LT
                        | SyntaxKind::GT
                        | SyntaxKind::LE
                        | SyntaxKind::GE
                        | SyntaxKind::AND_KW
                        | SyntaxKind::OR_KW
                )
            })
    }
}

// ── Call / index / field ─────────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The callee expression (function being called).
    pub fn callee(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }

    /// Convenience: the arguments as a vector.
    pub fn args(&self) -> Vec<Expr> {
        self.arg_list()
            .map(|al| al.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.syntax.children().filter_map(Expr::cast)
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    /// The expression being indexed.
    pub fn base(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The first index expression.
    pub fn index(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(FieldAccess, FIELD_ACCESS);

impl FieldAccess {
    /// The expression being accessed.
    pub fn base(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The field name token (the IDENT after the dot).
    pub fn field(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .last()
    }
}

// ── Composite literals ───────────────────────────────────────────────────

ast_node!(TupleExpr, TUPLE_EXPR);

impl TupleExpr {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.syntax.children().filter_map(Expr::cast)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        self.syntax.children().filter_map(Expr::cast)
    }
}

ast_node!(RecordExpr, RECORD_EXPR);

impl RecordExpr {
    pub fn fields(&self) -> impl Iterator<Item = RecordField> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(RecordField, RECORD_FIELD);

impl RecordField {
    pub fn name(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── F-strings ────────────────────────────────────────────────────────────

ast_node!(StringExpr, STRING_EXPR);

/// One piece of an interpolated string.
#[derive(Debug, Clone)]
pub enum StringPart {
    /// Raw literal content (escapes not yet decoded).
    Content(SyntaxToken),
    /// An embedded `{expr}` segment.
    Interpolation(Interpolation),
}

impl StringExpr {
    /// The string's parts in source order.
    pub fn parts(&self) -> Vec<StringPart> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| match el {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::STRING_CONTENT => {
                    Some(StringPart::Content(t))
                }
                rowan::NodeOrToken::Node(n) => {
                    Interpolation::cast(n).map(StringPart::Interpolation)
                }
                _ => None,
            })
            .collect()
    }
}

ast_node!(Interpolation, INTERPOLATION);

impl Interpolation {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Oracle forms ─────────────────────────────────────────────────────────

ast_node!(AskExpr, ASK_EXPR);

impl AskExpr {
    /// The oracle name.
    pub fn oracle(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    /// The prompt expression. The oracle name is the first expression
    /// child, so the input is the second.
    pub fn input(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    /// The `into Type` target, if present.
    pub fn into_ty(&self) -> Option<Type> {
        child_node::<IntoClause>(&self.syntax).and_then(|c| c.ty())
    }

    /// The `else expr` fallback, if present.
    pub fn fallback(&self) -> Option<Expr> {
        child_node::<ElseClause>(&self.syntax).and_then(|c| c.expr())
    }

    /// Whether a `with cost` marker is present.
    pub fn with_cost(&self) -> bool {
        self.syntax
            .children()
            .any(|n| n.kind() == SyntaxKind::COST_CLAUSE)
    }
}

ast_node!(ConsultExpr, CONSULT_EXPR);

impl ConsultExpr {
    pub fn oracle(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    pub fn input(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    pub fn into_ty(&self) -> Option<Type> {
        child_node::<IntoClause>(&self.syntax).and_then(|c| c.ty())
    }

    /// The attempt budget; defaults to 1 when no clause is present.
    pub fn attempts(&self) -> i64 {
        child_node::<AttemptsClause>(&self.syntax)
            .and_then(|c| c.count())
            .unwrap_or(1)
    }

    /// The `retry with hint` expression, if present.
    pub fn hint(&self) -> Option<Expr> {
        child_node::<OnFailureClause>(&self.syntax)
            .and_then(|c| child_node::<RetryClause>(&c.syntax))
            .and_then(|r| r.expr())
    }

    /// The fallback: a `yield expr` action or a trailing `else expr`.
    pub fn fallback(&self) -> Option<Expr> {
        let from_yield = child_node::<OnFailureClause>(&self.syntax)
            .and_then(|c| child_node::<YieldClause>(&c.syntax))
            .and_then(|y| y.expr());
        from_yield.or_else(|| child_node::<ElseClause>(&self.syntax).and_then(|c| c.expr()))
    }
}

ast_node!(EmbedExpr, EMBED_EXPR);

impl EmbedExpr {
    pub fn oracle(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    pub fn input(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

// ── Clause nodes ─────────────────────────────────────────────────────────

ast_node!(IntoClause, INTO_CLAUSE);

impl IntoClause {
    pub fn ty(&self) -> Option<Type> {
        self.syntax.children().find_map(Type::cast)
    }
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(AttemptsClause, ATTEMPTS_CLAUSE);

impl AttemptsClause {
    pub fn count(&self) -> Option<i64> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::INT_LITERAL)
            .and_then(|t| t.text().parse().ok())
    }
}

ast_node!(OnFailureClause, ON_FAILURE_CLAUSE);

ast_node!(RetryClause, RETRY_CLAUSE);

impl RetryClause {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(YieldClause, YIELD_CLAUSE);

impl YieldClause {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}
