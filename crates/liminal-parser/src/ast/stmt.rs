//! Typed AST nodes for statements.

use crate::ast::expr::Expr;
use crate::ast::item::Name;
use crate::ast::{ast_node, child_node, child_nodes, AstNode};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

/// Any statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    Assign(AssignStmt),
    ExprStmt(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    Case(CaseStmt),
    Loop(LoopStmt),
    Parallel(ParallelStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Return(ReturnStmt),
    Try(TryStmt),
    Block(Block),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::ASSIGN_STMT => Some(Stmt::Assign(AssignStmt { syntax: node })),
            SyntaxKind::EXPR_STMT => Some(Stmt::ExprStmt(ExprStmt { syntax: node })),
            SyntaxKind::IF_STMT => Some(Stmt::If(IfStmt { syntax: node })),
            SyntaxKind::WHILE_STMT => Some(Stmt::While(WhileStmt { syntax: node })),
            SyntaxKind::REPEAT_STMT => Some(Stmt::Repeat(RepeatStmt { syntax: node })),
            SyntaxKind::FOR_STMT => Some(Stmt::For(ForStmt { syntax: node })),
            SyntaxKind::FOR_IN_STMT => Some(Stmt::ForIn(ForInStmt { syntax: node })),
            SyntaxKind::CASE_STMT => Some(Stmt::Case(CaseStmt { syntax: node })),
            SyntaxKind::LOOP_STMT => Some(Stmt::Loop(LoopStmt { syntax: node })),
            SyntaxKind::PARALLEL_STMT => Some(Stmt::Parallel(ParallelStmt { syntax: node })),
            SyntaxKind::BREAK_STMT => Some(Stmt::Break(BreakStmt { syntax: node })),
            SyntaxKind::CONTINUE_STMT => Some(Stmt::Continue(ContinueStmt { syntax: node })),
            SyntaxKind::RETURN_STMT => Some(Stmt::Return(ReturnStmt { syntax: node })),
            SyntaxKind::TRY_STMT => Some(Stmt::Try(TryStmt { syntax: node })),
            SyntaxKind::BLOCK => Some(Stmt::Block(Block { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Stmt::Assign(n) => &n.syntax,
            Stmt::ExprStmt(n) => &n.syntax,
            Stmt::If(n) => &n.syntax,
            Stmt::While(n) => &n.syntax,
            Stmt::Repeat(n) => &n.syntax,
            Stmt::For(n) => &n.syntax,
            Stmt::ForIn(n) => &n.syntax,
            Stmt::Case(n) => &n.syntax,
            Stmt::Loop(n) => &n.syntax,
            Stmt::Parallel(n) => &n.syntax,
            Stmt::Break(n) => &n.syntax,
            Stmt::Continue(n) => &n.syntax,
            Stmt::Return(n) => &n.syntax,
            Stmt::Try(n) => &n.syntax,
            Stmt::Block(n) => &n.syntax,
        }
    }
}

// ── Blocks ───────────────────────────────────────────────────────────────

ast_node!(Block, BLOCK);

impl Block {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

// ── Simple statements ────────────────────────────────────────────────────

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    pub fn target(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(BreakStmt, BREAK_STMT);
ast_node!(ContinueStmt, CONTINUE_STMT);

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Control flow ─────────────────────────────────────────────────────────

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn cond(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        self.syntax.children().filter_map(Stmt::cast).nth(1)
    }
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn cond(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(RepeatStmt, REPEAT_STMT);

impl RepeatStmt {
    /// The loop body statements (everything before `until`).
    pub fn body_stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }

    /// The `until` condition (the only direct expression child).
    pub fn cond(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(ForStmt, FOR_STMT);

impl ForStmt {
    pub fn var(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn init(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn limit(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    /// Whether the loop counts down (`downto`). The direction bit is
    /// authoritative; operand values are never inspected.
    pub fn descending(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .any(|t| t.kind() == SyntaxKind::DOWNTO_KW)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(ForInStmt, FOR_IN_STMT);

impl ForInStmt {
    pub fn var(&self) -> Option<String> {
        child_node::<Name>(&self.syntax).and_then(|n| n.text())
    }

    pub fn iterable(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(CaseStmt, CASE_STMT);

impl CaseStmt {
    pub fn scrutinee(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn arms(&self) -> impl Iterator<Item = CaseArm> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn else_arm(&self) -> Option<CaseElse> {
        child_node(&self.syntax)
    }
}

ast_node!(CaseArm, CASE_ARM);

impl CaseArm {
    pub fn pattern(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(CaseElse, CASE_ELSE);

impl CaseElse {
    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(LoopStmt, LOOP_STMT);

impl LoopStmt {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

ast_node!(ParallelStmt, PARALLEL_STMT);

impl ParallelStmt {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    /// The statements of the protected block.
    pub fn body_stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }

    pub fn except(&self) -> Option<ExceptClause> {
        child_node(&self.syntax)
    }
}

ast_node!(ExceptClause, EXCEPT_CLAUSE);

impl ExceptClause {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}
