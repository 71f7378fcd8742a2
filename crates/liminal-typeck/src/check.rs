//! The Liminal type checker.
//!
//! Three declaration passes over the program (named types, globals, function
//! signatures), then the main body and every function body are checked in
//! nested scopes. Errors are accumulated; checking never aborts.

use liminal_common::literal::unescape_string;
use liminal_common::span::Span;
use liminal_parser::ast::expr::{
    AskExpr, BinaryExpr, CallExpr, ConsultExpr, Expr, FieldAccess, StringPart,
};
use liminal_parser::ast::item::{FieldDecl, FuncDecl, Program, VarDecl};
use liminal_parser::ast::stmt::Stmt;
use liminal_parser::ast::ty as ast_ty;
use liminal_parser::ast::AstNode;
use liminal_parser::{Parse, SyntaxKind, SyntaxNode};

use crate::env::{SymbolKind, SymbolTable};
use crate::error::TypeError;
use crate::ty::{ty_equals, SchemaDef, SchemaField, SchemaTable, Ty};
use crate::TypeckResult;

/// Byte span of a syntax node.
fn span_of(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(range.start().into(), range.end().into())
}

pub(crate) struct Checker {
    symbols: SymbolTable,
    errors: Vec<TypeError>,
    schemas: SchemaTable,
    program: Program,
}

impl Checker {
    pub(crate) fn run(parse: &Parse) -> TypeckResult {
        let mut checker = Checker {
            symbols: SymbolTable::new(),
            errors: Vec::new(),
            schemas: SchemaTable::default(),
            program: parse.program(),
        };
        checker.check_program();
        TypeckResult {
            errors: checker.errors,
            schemas: checker.schemas,
        }
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push(TypeError::new(message, span));
    }

    // ── Passes ─────────────────────────────────────────────────────────

    fn check_program(&mut self) {
        self.declare_types();
        self.declare_globals();
        self.declare_functions();

        // Global initializers.
        let var_decls: Vec<VarDecl> = self.program.var_decls().collect();
        for vd in &var_decls {
            if let Some(init) = vd.init() {
                let decl_ty = vd
                    .ty()
                    .map(|t| self.ty_from_ast(&t))
                    .unwrap_or(Ty::Unknown);
                let init_ty = self.check_expr(&init);
                if !ty_equals(&decl_ty, &init_ty) {
                    self.error(
                        format!("Type mismatch in var init: {decl_ty} := {init_ty}"),
                        span_of(vd.syntax()),
                    );
                }
            }
        }

        // Main body.
        if let Some(body) = self.program.body() {
            self.check_stmt(&Stmt::Block(body));
        }

        // Function bodies.
        let functions: Vec<FuncDecl> = self.program.functions().collect();
        for func in &functions {
            self.check_function(func);
        }
    }

    /// Pass 1: declare named types. Enum variants also bind as Int-valued
    /// constants; schema declarations populate the schema table.
    fn declare_types(&mut self) {
        let decls: Vec<_> = self.program.type_decls().collect();
        for decl in decls {
            let Some(name) = decl.name() else { continue };
            let Some(ty_node) = decl.ty() else { continue };

            if let ast_ty::Type::Schema(schema) = &ty_node {
                let def = self.build_schema_def(&name, schema);
                let ty = def.ty();
                self.schemas.push(def);
                self.symbols.define(SymbolKind::Type, name, ty);
                continue;
            }

            let target = self.ty_from_ast(&ty_node);
            if let Ty::Enum(variants) = &target {
                for variant in variants.clone() {
                    self.symbols.define(SymbolKind::Var, variant, Ty::Int);
                }
            }
            let aliased = Ty::Alias(name.clone(), Box::new(target));
            self.symbols.define(SymbolKind::Type, name, aliased);
        }
    }

    /// Pass 2: declare global variables. Record- and schema-typed globals
    /// also bind dotted-path sub-names (`P.Name`) to their field types.
    fn declare_globals(&mut self) {
        let decls: Vec<VarDecl> = self.program.var_decls().collect();
        for vd in &decls {
            let ty = vd
                .ty()
                .map(|t| self.ty_from_ast(&t))
                .unwrap_or(Ty::Unknown);
            for name in vd.names() {
                if let Some(fields) = ty.fields().map(|f| f.to_vec()) {
                    for (fname, fty) in fields {
                        self.symbols
                            .define(SymbolKind::Var, format!("{name}.{fname}"), fty);
                    }
                }
                self.symbols.define(SymbolKind::Var, name, ty.clone());
            }
        }
    }

    /// Pass 3: declare function signatures (name -> result type).
    fn declare_functions(&mut self) {
        let functions: Vec<FuncDecl> = self.program.functions().collect();
        for func in &functions {
            let Some(name) = func.name() else { continue };
            let result_ty = func
                .result_ty()
                .map(|t| self.ty_from_ast(&t))
                .unwrap_or(Ty::Unknown);
            self.symbols.define(SymbolKind::Func, name, result_ty);
        }
    }

    fn check_function(&mut self, func: &FuncDecl) {
        self.symbols.push_scope();

        if let Some(params) = func.param_list() {
            let params: Vec<_> = params.params().collect();
            for param in &params {
                let ty = param
                    .ty()
                    .map(|t| self.ty_from_ast(&t))
                    .unwrap_or(Ty::Unknown);
                for name in param.names() {
                    self.symbols.define(SymbolKind::Var, name, ty.clone());
                }
            }
        }

        // Assignment to the synthetic local `Result` is how a function
        // returns its value.
        let result_ty = func
            .result_ty()
            .map(|t| self.ty_from_ast(&t))
            .unwrap_or(Ty::Unknown);
        self.symbols.define(SymbolKind::Var, "Result", result_ty);

        if let Some(var_block) = func.var_block() {
            let decls: Vec<VarDecl> = var_block.var_decls().collect();
            for vd in &decls {
                let ty = vd
                    .ty()
                    .map(|t| self.ty_from_ast(&t))
                    .unwrap_or(Ty::Unknown);
                for name in vd.names() {
                    if let Some(fields) = ty.fields().map(|f| f.to_vec()) {
                        for (fname, fty) in fields {
                            self.symbols
                                .define(SymbolKind::Var, format!("{name}.{fname}"), fty);
                        }
                    }
                    self.symbols.define(SymbolKind::Var, name, ty.clone());
                }
            }
        }

        if let Some(body) = func.body() {
            let stmts: Vec<Stmt> = body.stmts().collect();
            for stmt in &stmts {
                self.check_stmt(stmt);
            }
        }

        self.symbols.pop_scope();
    }

    // ── Types from the AST ─────────────────────────────────────────────

    fn ty_from_ast(&mut self, node: &ast_ty::Type) -> Ty {
        match node {
            ast_ty::Type::Ref(r) => self.resolve_type_name(r.name().as_deref()),
            ast_ty::Type::Array(a) => {
                let elem = a
                    .elem()
                    .map(|t| self.ty_from_ast(&t))
                    .unwrap_or(Ty::Unknown);
                Ty::array(elem)
            }
            ast_ty::Type::Tuple(t) => {
                let elems = t.elements().map(|e| self.ty_from_ast(&e)).collect();
                Ty::Tuple(elems)
            }
            ast_ty::Type::Record(r) => {
                let fields = r
                    .fields()
                    .map(|f| self.field_entry(&f))
                    .collect();
                Ty::Record(fields)
            }
            ast_ty::Type::Enum(e) => Ty::Enum(e.variants()),
            ast_ty::Type::Optional(o) => {
                let inner = o
                    .inner()
                    .map(|t| self.ty_from_ast(&t))
                    .unwrap_or(Ty::Unknown);
                Ty::optional(inner)
            }
            ast_ty::Type::Result(r) => {
                let ok = r.ok().map(|t| self.ty_from_ast(&t)).unwrap_or(Ty::Unknown);
                Ty::result(ok, Ty::Str)
            }
            // Constraints narrow the value set, not the type.
            ast_ty::Type::Constrained(c) => {
                let base = c.base().and_then(|b| b.name());
                self.resolve_type_name(base.as_deref())
            }
            ast_ty::Type::Schema(s) => {
                let fields = s.fields().map(|f| self.field_entry(&f)).collect();
                Ty::Record(fields)
            }
        }
    }

    fn field_entry(&mut self, field: &FieldDecl) -> (String, Ty) {
        let name = field.name().unwrap_or_default();
        let ty = field
            .ty()
            .map(|t| self.ty_from_ast(&t))
            .unwrap_or(Ty::Unknown);
        (name, ty)
    }

    fn resolve_type_name(&self, name: Option<&str>) -> Ty {
        let Some(name) = name else { return Ty::Unknown };
        if let Some(sym) = self.symbols.lookup(name) {
            if sym.kind == SymbolKind::Type {
                return sym.ty.clone();
            }
        }
        match name.to_ascii_lowercase().as_str() {
            "integer" => Ty::Int,
            "real" => Ty::Real,
            "boolean" => Ty::Bool,
            "string" => Ty::Str,
            "bytes" => Ty::Bytes,
            "char" => Ty::Char,
            "byte" => Ty::Byte,
            _ => Ty::Unknown,
        }
    }

    fn build_schema_def(&mut self, name: &str, schema: &ast_ty::SchemaType) -> SchemaDef {
        let mut fields = Vec::new();
        let decls: Vec<FieldDecl> = schema.fields().collect();
        for fd in &decls {
            let fname = fd.name().unwrap_or_default();
            let fty = fd
                .ty()
                .map(|t| self.ty_from_ast(&t))
                .unwrap_or(Ty::Unknown);
            let description = fd.describe().map(|t| unescape_string(t.text()));
            let (mut min, mut max, mut pattern) = (None, None, None);
            if let Some(ast_ty::Type::Constrained(c)) = fd.ty() {
                let (lo, hi) = c.bounds();
                min = lo;
                max = hi;
                pattern = c.pattern().map(|t| unescape_string(t.text()));
            }
            fields.push(SchemaField {
                name: fname,
                ty: fty,
                description,
                min,
                max,
                pattern,
            });
        }
        SchemaDef {
            name: name.to_string(),
            fields,
        }
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) => {
                let lt = assign
                    .target()
                    .map(|e| self.check_expr(&e))
                    .unwrap_or(Ty::Unknown);
                let rt = assign
                    .value()
                    .map(|e| self.check_expr(&e))
                    .unwrap_or(Ty::Unknown);
                if !self.assignable(&lt, &rt) {
                    self.error(
                        format!("Type mismatch: {lt} := {rt}"),
                        span_of(assign.syntax()),
                    );
                }
            }
            Stmt::ExprStmt(es) => {
                if let Some(e) = es.expr() {
                    self.check_expr(&e);
                }
            }
            Stmt::If(s) => {
                if let Some(c) = s.cond() {
                    self.check_expr(&c);
                }
                if let Some(t) = s.then_branch() {
                    self.check_stmt(&t);
                }
                if let Some(e) = s.else_branch() {
                    self.check_stmt(&e);
                }
            }
            Stmt::While(s) => {
                if let Some(c) = s.cond() {
                    self.check_expr(&c);
                }
                if let Some(b) = s.body() {
                    self.check_stmt(&b);
                }
            }
            Stmt::Repeat(s) => {
                let body: Vec<Stmt> = s.body_stmts().collect();
                for st in &body {
                    self.check_stmt(st);
                }
                if let Some(c) = s.cond() {
                    self.check_expr(&c);
                }
            }
            Stmt::For(s) => {
                if let Some(var) = s.var() {
                    if self.symbols.lookup(&var).is_none() {
                        self.symbols.define(SymbolKind::Var, var, Ty::Int);
                    }
                }
                if let Some(e) = s.init() {
                    self.check_expr(&e);
                }
                if let Some(e) = s.limit() {
                    self.check_expr(&e);
                }
                if let Some(b) = s.body() {
                    self.check_stmt(&b);
                }
            }
            Stmt::ForIn(s) => {
                if let Some(var) = s.var() {
                    if self.symbols.lookup(&var).is_none() {
                        self.symbols.define(SymbolKind::Var, var, Ty::Int);
                    }
                }
                if let Some(e) = s.iterable() {
                    self.check_expr(&e);
                }
                if let Some(b) = s.body() {
                    self.check_stmt(&b);
                }
            }
            Stmt::Block(b) => {
                self.symbols.push_scope();
                let stmts: Vec<Stmt> = b.stmts().collect();
                for st in &stmts {
                    self.check_stmt(st);
                }
                self.symbols.pop_scope();
            }
            Stmt::Return(r) => {
                if let Some(v) = r.value() {
                    self.check_expr(&v);
                }
            }
            // Case arms bind their pattern variables only at lowering;
            // loop/parallel/try bodies are checked when they run as blocks.
            Stmt::Case(_)
            | Stmt::Loop(_)
            | Stmt::Parallel(_)
            | Stmt::Try(_)
            | Stmt::Break(_)
            | Stmt::Continue(_) => {}
        }
    }

    /// Assignment compatibility: structural equality plus the relaxations
    /// from the original semantics (String <- Char, Optional absorption,
    /// Result with unknown sides, Enum <-> Int via equality).
    fn assignable(&self, lt: &Ty, rt: &Ty) -> bool {
        if ty_equals(lt, rt) {
            return true;
        }
        let l = lt.resolved();
        let r = rt.resolved();
        if matches!(l, Ty::Str) && matches!(r, Ty::Char) {
            return true;
        }
        if let Ty::Optional(inner) = l {
            if ty_equals(inner, r) {
                return true;
            }
            if let Ty::Optional(rin) = r {
                if matches!(rin.resolved(), Ty::Unknown) {
                    return true;
                }
            }
        }
        if let Ty::Result(lok, lerr) = l {
            if let Ty::Result(rok, rerr) = r {
                let ok_side =
                    ty_equals(lok, rok) || matches!(rok.resolved(), Ty::Unknown);
                let err_side =
                    ty_equals(lerr, rerr) || matches!(rerr.resolved(), Ty::Unknown);
                if ok_side && err_side {
                    return true;
                }
                if matches!(rok.resolved(), Ty::Unknown) {
                    return true;
                }
            }
        }
        false
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn check_expr(&mut self, expr: &Expr) -> Ty {
        match expr {
            Expr::Literal(lit) => match lit.token().map(|t| t.kind()) {
                Some(SyntaxKind::INT_LITERAL) => Ty::Int,
                Some(SyntaxKind::REAL_LITERAL) => Ty::Real,
                Some(SyntaxKind::STRING_LITERAL) => Ty::Str,
                Some(SyntaxKind::CHAR_LITERAL) => Ty::Char,
                Some(SyntaxKind::BYTES_LITERAL) => Ty::Bytes,
                Some(SyntaxKind::TRUE_KW) | Some(SyntaxKind::FALSE_KW) => Ty::Bool,
                // Durations lower to their value in milliseconds; money to
                // a real amount.
                Some(SyntaxKind::DURATION_LITERAL) => Ty::Int,
                Some(SyntaxKind::MONEY_LITERAL) => Ty::Real,
                _ => Ty::Unknown,
            },
            Expr::NameRef(name) => {
                let Some(text) = name.text() else {
                    return Ty::Unknown;
                };
                if let Some(sym) = self.symbols.lookup(&text) {
                    return sym.ty.clone();
                }
                if text.eq_ignore_ascii_case("Nothing") {
                    return Ty::optional(Ty::Unknown);
                }
                self.error(
                    format!("Undeclared identifier {text}"),
                    span_of(name.syntax()),
                );
                Ty::Unknown
            }
            Expr::Paren(p) => p
                .inner()
                .map(|e| self.check_expr(&e))
                .unwrap_or(Ty::Unknown),
            Expr::Unary(u) => u
                .operand()
                .map(|e| self.check_expr(&e))
                .unwrap_or(Ty::Unknown),
            Expr::Binary(b) => self.check_binary(b),
            Expr::Call(c) => self.check_call(c),
            Expr::Index(idx) => {
                let base_ty = idx
                    .base()
                    .map(|e| self.check_expr(&e))
                    .unwrap_or(Ty::Unknown);
                if let Some(i) = idx.index() {
                    self.check_expr(&i);
                }
                match base_ty.resolved() {
                    Ty::Array(elem) => (**elem).clone(),
                    _ => Ty::Unknown,
                }
            }
            Expr::Field(fa) => self.check_field(fa),
            Expr::Tuple(t) => {
                let elems: Vec<Expr> = t.elements().collect();
                let tys = elems.iter().map(|e| self.check_expr(e)).collect();
                Ty::Tuple(tys)
            }
            Expr::Array(a) => {
                let elems: Vec<Expr> = a.elements().collect();
                let mut elem_ty: Option<Ty> = None;
                for e in &elems {
                    let t = self.check_expr(e);
                    match &elem_ty {
                        None => elem_ty = Some(t),
                        Some(prev) => {
                            if !ty_equals(prev, &t) {
                                self.error(
                                    "Array elements must be same type",
                                    span_of(a.syntax()),
                                );
                            }
                        }
                    }
                }
                Ty::array(elem_ty.unwrap_or(Ty::Unknown))
            }
            Expr::Record(r) => {
                let fields: Vec<_> = r.fields().collect();
                let entries = fields
                    .iter()
                    .map(|f| {
                        let name = f.name().unwrap_or_default();
                        let ty = f
                            .value()
                            .map(|e| self.check_expr(&e))
                            .unwrap_or(Ty::Unknown);
                        (name, ty)
                    })
                    .collect();
                Ty::Record(entries)
            }
            Expr::FString(s) => {
                for part in s.parts() {
                    if let StringPart::Interpolation(interp) = part {
                        if let Some(e) = interp.expr() {
                            self.check_expr(&e);
                        }
                    }
                }
                Ty::Str
            }
            Expr::Ask(ask) => self.check_ask(ask),
            Expr::Consult(consult) => self.check_consult(consult),
            Expr::Embed(embed) => {
                if let Some(input) = embed.input() {
                    self.check_expr(&input);
                }
                Ty::Bytes
            }
        }
    }

    fn check_binary(&mut self, b: &BinaryExpr) -> Ty {
        let lt = b.lhs().map(|e| self.check_expr(&e)).unwrap_or(Ty::Unknown);
        let rt = b.rhs().map(|e| self.check_expr(&e)).unwrap_or(Ty::Unknown);
        let op = match b.op() {
            Some(op) => op.kind(),
            None => return Ty::Unknown,
        };
        let l = lt.resolved().clone();
        let r = rt.resolved().clone();
        match op {
            SyntaxKind::PLUS => {
                if matches!(l, Ty::Str) && matches!(r, Ty::Str | Ty::Char) {
                    return Ty::Str;
                }
                if matches!(r, Ty::Str) && matches!(l, Ty::Str | Ty::Char) {
                    return Ty::Str;
                }
                self.numeric_result(&l, &r, b)
            }
            SyntaxKind::MINUS
            | SyntaxKind::STAR
            | SyntaxKind::SLASH
            | SyntaxKind::DIV_KW
            | SyntaxKind::MOD_KW => self.numeric_result(&l, &r, b),
            SyntaxKind::EQ
            | SyntaxKind::NEQ
            | SyntaxKind::LT
            | SyntaxKind::GT
            | SyntaxKind::LE
            | SyntaxKind::GE
            | SyntaxKind::AND_KW
            | SyntaxKind::OR_KW => Ty::Bool,
            _ => Ty::Unknown,
        }
    }

    fn numeric_result(&mut self, l: &Ty, r: &Ty, b: &BinaryExpr) -> Ty {
        // Enums participate in arithmetic as their Int value.
        let l_num = l.is_numeric() || matches!(l, Ty::Enum(_));
        let r_num = r.is_numeric() || matches!(r, Ty::Enum(_));
        if !l_num || !r_num {
            self.error("Arithmetic on non-numeric", span_of(b.syntax()));
            return Ty::Unknown;
        }
        if matches!(l, Ty::Real) || matches!(r, Ty::Real) {
            Ty::Real
        } else {
            Ty::Int
        }
    }

    fn check_call(&mut self, call: &CallExpr) -> Ty {
        let args = call.args();

        // Method-style calls on Result values.
        if let Some(Expr::Field(fa)) = call.callee() {
            let method = fa
                .field()
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            if let Some(base) = fa.base() {
                self.check_expr(&base);
            }
            for arg in &args {
                self.check_expr(arg);
            }
            if method.eq_ignore_ascii_case("UnwrapOr") {
                return Ty::Str;
            }
            if method.eq_ignore_ascii_case("IsOk") {
                return Ty::Bool;
            }
            if method.eq_ignore_ascii_case("UnwrapErr") {
                return Ty::Str;
            }
            return Ty::Unknown;
        }

        let Some(Expr::NameRef(callee)) = call.callee() else {
            for arg in &args {
                self.check_expr(arg);
            }
            return Ty::Unknown;
        };
        let name = callee.text().unwrap_or_default();

        if name.eq_ignore_ascii_case("Ok") && args.len() == 1 {
            let arg_ty = self.check_expr(&args[0]);
            return Ty::result(arg_ty, Ty::Str);
        }
        if name.eq_ignore_ascii_case("Err") && args.len() == 1 {
            self.check_expr(&args[0]);
            return Ty::result(Ty::Unknown, Ty::Str);
        }
        if name.eq_ignore_ascii_case("ReadLn") {
            // The target variable is written at runtime; an undeclared name
            // here is not an error.
            return Ty::Unknown;
        }

        for arg in &args {
            self.check_expr(arg);
        }

        if name.eq_ignore_ascii_case("ReadFile") {
            return Ty::Str;
        }
        if name.eq_ignore_ascii_case("WriteFile")
            || name.eq_ignore_ascii_case("Write")
            || name.eq_ignore_ascii_case("WriteLn")
        {
            return Ty::Unknown;
        }
        if name.eq_ignore_ascii_case("Ask") {
            return Ty::result(Ty::Str, Ty::Str);
        }

        if let Some(sym) = self.symbols.lookup(&name) {
            return sym.ty.clone();
        }

        // Fall back to the program's function declarations by name.
        let functions: Vec<FuncDecl> = self.program.functions().collect();
        for func in &functions {
            if func
                .name()
                .is_some_and(|n| n.eq_ignore_ascii_case(&name))
            {
                return func
                    .result_ty()
                    .map(|t| self.ty_from_ast(&t))
                    .unwrap_or(Ty::Unknown);
            }
        }
        Ty::Unknown
    }

    fn check_field(&mut self, fa: &FieldAccess) -> Ty {
        let base_ty = fa
            .base()
            .map(|e| self.check_expr(&e))
            .unwrap_or(Ty::Unknown);
        let field = fa
            .field()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        if base_ty.fields().is_some() {
            match base_ty.field(&field) {
                Some(ty) => ty.clone(),
                None => {
                    self.error(
                        format!("Unknown field {field}"),
                        span_of(fa.syntax()),
                    );
                    Ty::Unknown
                }
            }
        } else {
            Ty::Unknown
        }
    }

    fn check_ask(&mut self, ask: &AskExpr) -> Ty {
        if let Some(input) = ask.input() {
            self.check_expr(&input);
        }
        if let Some(fb) = ask.fallback() {
            self.check_expr(&fb);
        }
        match ask.into_ty() {
            Some(ty) => self.ty_from_ast(&ty),
            None => Ty::Str,
        }
    }

    fn check_consult(&mut self, consult: &ConsultExpr) -> Ty {
        if let Some(input) = consult.input() {
            self.check_expr(&input);
        }
        if let Some(hint) = consult.hint() {
            self.check_expr(&hint);
        }
        if let Some(fb) = consult.fallback() {
            self.check_expr(&fb);
        }
        match consult.into_ty() {
            Some(ty) => self.ty_from_ast(&ty),
            None => Ty::Str,
        }
    }
}
