//! AST → IR lowering.
//!
//! Each function lowers to a linear instruction list; expressions evaluate
//! into fresh destination slots allocated monotonically. Control flow
//! lowers to labels and conditional jumps; `consult` materializes its retry
//! loop with hidden locals; records and arrays flatten into dotted
//! field-path names (`P.Name`, `A.0`, `A.len`).

use liminal_common::literal::{decode_escapes, unescape_string};
use liminal_parser::ast::expr::{CallExpr, ConsultExpr, Expr, StringPart};
use liminal_parser::ast::item::VarDecl;
use liminal_parser::ast::stmt::{Block, Stmt};
use liminal_parser::ast::ty as ast_ty;
use liminal_parser::{Parse, SyntaxKind};
use liminal_typeck::TypeckResult;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ir::{Function, Opcode, Program, NO_SLOT};

/// Lower a checked program to IR.
///
/// The entry function (`main`: global initializers followed by the main
/// body) comes first, then each declared function. The typecheck's schema
/// table moves into the program, which owns the schemas its `ask`
/// instructions reference.
pub fn lower(parse: &Parse, typeck: &TypeckResult) -> Program {
    let program = parse.program();

    let mut ctx = LowerCtx {
        enum_consts: FxHashMap::default(),
        schema_names: FxHashSet::default(),
    };
    for decl in program.type_decls() {
        if let Some(ast_ty::Type::Enum(e)) = decl.ty() {
            for (index, variant) in e.variants().into_iter().enumerate() {
                ctx.enum_consts.insert(variant, index as i64);
            }
        }
    }
    for schema in typeck.schemas.iter() {
        ctx.schema_names.insert(schema.name.clone());
    }

    let mut funcs = Vec::new();

    // Entry function: global initializers, then the main body.
    let mut main = FnLowerer::new("main", &ctx);
    let var_decls: Vec<VarDecl> = program.var_decls().collect();
    for vd in &var_decls {
        if let Some(init) = vd.init() {
            for name in vd.names() {
                main.lower_assign_to_name(&name, &init);
            }
        }
    }
    if let Some(body) = program.body() {
        main.lower_block(&body);
    }
    funcs.push(main.finish());

    for func in program.functions() {
        let name = func.name().unwrap_or_default();
        let mut fl = FnLowerer::new(&name, &ctx);
        fl.f.params = func.param_names();
        if let Some(var_block) = func.var_block() {
            let decls: Vec<VarDecl> = var_block.var_decls().collect();
            for vd in &decls {
                if let Some(init) = vd.init() {
                    for vname in vd.names() {
                        fl.lower_assign_to_name(&vname, &init);
                    }
                }
            }
        }
        if let Some(body) = func.body() {
            fl.lower_block(&body);
        }
        funcs.push(fl.finish());
    }

    Program {
        funcs,
        schemas: typeck.schemas.clone(),
    }
}

struct LowerCtx {
    /// Enum variant name -> variant index.
    enum_consts: FxHashMap<String, i64>,
    /// Names usable as `into` schema targets.
    schema_names: FxHashSet<String>,
}

struct FnLowerer<'a> {
    f: Function,
    ctx: &'a LowerCtx,
    /// Stack of (continue target, break target) labels.
    loops: Vec<(String, String)>,
    /// Counter for hidden local names.
    hidden: u32,
}

impl<'a> FnLowerer<'a> {
    fn new(name: &str, ctx: &'a LowerCtx) -> Self {
        FnLowerer {
            f: Function::new(name),
            ctx,
            loops: Vec::new(),
            hidden: 0,
        }
    }

    fn finish(self) -> Function {
        self.f
    }

    fn hidden_name(&mut self, stem: &str) -> String {
        let n = self.hidden;
        self.hidden += 1;
        format!("__{stem}{n}")
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn lower_block(&mut self, block: &Block) {
        let stmts: Vec<Stmt> = block.stmts().collect();
        for stmt in &stmts {
            self.lower_stmt(stmt);
        }
    }

    fn lower_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) => {
                let (Some(target), Some(value)) = (assign.target(), assign.value()) else {
                    return;
                };
                match &target {
                    Expr::NameRef(name) => {
                        if let Some(name) = name.text() {
                            self.lower_assign_to_name(&name, &value);
                        }
                    }
                    Expr::Field(_) => match flat_path(&target) {
                        Some(path) => {
                            let v = self.lower_expr(&value);
                            self.f.emit_store_var(&path, v);
                        }
                        None => {
                            self.lower_expr(&value);
                        }
                    },
                    Expr::Index(idx) => {
                        let base = idx.base().and_then(|b| flat_path(&b));
                        let literal_index = idx.index().and_then(|i| int_literal(&i));
                        match (base, literal_index) {
                            (Some(base), Some(k)) => {
                                let v = self.lower_expr(&value);
                                self.f.emit_store_var(&format!("{base}.{k}"), v);
                            }
                            _ => {
                                // Computed element stores have no opcode in
                                // the flat-name model; evaluate and drop.
                                self.lower_expr(&value);
                            }
                        }
                    }
                    _ => {
                        self.lower_expr(&value);
                    }
                }
            }
            Stmt::ExprStmt(es) => {
                if let Some(expr) = es.expr() {
                    self.lower_expr_discard(&expr);
                }
            }
            Stmt::If(s) => {
                let Some(cond) = s.cond() else { return };
                let c = self.lower_expr(&cond);
                let end = self.f.fresh_label("endif");
                match s.else_branch() {
                    Some(else_branch) => {
                        let else_lbl = self.f.fresh_label("else");
                        self.f.emit_jump_if_false(c, &else_lbl);
                        if let Some(then_branch) = s.then_branch() {
                            self.lower_stmt(&then_branch);
                        }
                        self.f.emit_jump(&end);
                        self.f.emit_label(&else_lbl);
                        self.lower_stmt(&else_branch);
                        self.f.emit_label(&end);
                    }
                    None => {
                        self.f.emit_jump_if_false(c, &end);
                        if let Some(then_branch) = s.then_branch() {
                            self.lower_stmt(&then_branch);
                        }
                        self.f.emit_label(&end);
                    }
                }
            }
            Stmt::While(s) => {
                let loop_lbl = self.f.fresh_label("while");
                let end = self.f.fresh_label("endwhile");
                self.f.emit_label(&loop_lbl);
                if let Some(cond) = s.cond() {
                    let c = self.lower_expr(&cond);
                    self.f.emit_jump_if_false(c, &end);
                }
                self.loops.push((loop_lbl.clone(), end.clone()));
                if let Some(body) = s.body() {
                    self.lower_stmt(&body);
                }
                self.loops.pop();
                self.f.emit_jump(&loop_lbl);
                self.f.emit_label(&end);
            }
            Stmt::Repeat(s) => {
                let body_lbl = self.f.fresh_label("repeat");
                let cond_lbl = self.f.fresh_label("until");
                let end = self.f.fresh_label("endrepeat");
                self.f.emit_label(&body_lbl);
                self.loops.push((cond_lbl.clone(), end.clone()));
                let body: Vec<Stmt> = s.body_stmts().collect();
                for st in &body {
                    self.lower_stmt(st);
                }
                self.loops.pop();
                self.f.emit_label(&cond_lbl);
                if let Some(cond) = s.cond() {
                    let c = self.lower_expr(&cond);
                    self.f.emit_jump_if_false(c, &body_lbl);
                }
                self.f.emit_label(&end);
            }
            Stmt::For(s) => self.lower_for(s),
            Stmt::ForIn(s) => self.lower_for_in(s),
            Stmt::Case(s) => self.lower_case(s),
            Stmt::Loop(s) => {
                let loop_lbl = self.f.fresh_label("loop");
                let end = self.f.fresh_label("endloop");
                self.f.emit_label(&loop_lbl);
                self.loops.push((loop_lbl.clone(), end.clone()));
                let body: Vec<Stmt> = s.stmts().collect();
                for st in &body {
                    self.lower_stmt(st);
                }
                self.loops.pop();
                self.f.emit_jump(&loop_lbl);
                self.f.emit_label(&end);
            }
            // Parsed for forward compatibility; the body runs sequentially.
            Stmt::Parallel(s) => {
                let body: Vec<Stmt> = s.stmts().collect();
                for st in &body {
                    self.lower_stmt(st);
                }
            }
            Stmt::Break(_) => {
                if let Some((_, break_lbl)) = self.loops.last() {
                    let label = break_lbl.clone();
                    self.f.emit_jump(&label);
                }
            }
            Stmt::Continue(_) => {
                if let Some((continue_lbl, _)) = self.loops.last() {
                    let label = continue_lbl.clone();
                    self.f.emit_jump(&label);
                }
            }
            Stmt::Return(r) => {
                let slot = match r.value() {
                    Some(value) => self.lower_expr(&value),
                    None => self.f.emit_load_var("Result"),
                };
                self.f.emit_ret(slot);
            }
            // The except block is consumed but never lowered.
            Stmt::Try(s) => {
                let body: Vec<Stmt> = s.body_stmts().collect();
                for st in &body {
                    self.lower_stmt(st);
                }
            }
            Stmt::Block(b) => self.lower_block(b),
        }
    }

    /// `target := value` where target is a plain name. Array and record
    /// literals flatten into per-element / per-field stores.
    fn lower_assign_to_name(&mut self, name: &str, value: &Expr) {
        match value {
            Expr::Array(arr) => {
                let elems: Vec<Expr> = arr.elements().collect();
                for (i, elem) in elems.iter().enumerate() {
                    let v = self.lower_expr(elem);
                    self.f.emit_store_var(&format!("{name}.{i}"), v);
                }
                let len = self.f.emit_const_int(elems.len() as i64);
                self.f.emit_store_var(&format!("{name}.len"), len);
            }
            Expr::Tuple(tuple) => {
                let elems: Vec<Expr> = tuple.elements().collect();
                for (i, elem) in elems.iter().enumerate() {
                    let v = self.lower_expr(elem);
                    self.f.emit_store_var(&format!("{name}.{i}"), v);
                }
            }
            Expr::Record(record) => {
                let fields: Vec<_> = record.fields().collect();
                for field in &fields {
                    let Some(fname) = field.name() else { continue };
                    let Some(fvalue) = field.value() else { continue };
                    let v = self.lower_expr(&fvalue);
                    self.f.emit_store_var(&format!("{name}.{fname}"), v);
                }
            }
            _ => {
                let v = self.lower_expr(value);
                self.f.emit_store_var(name, v);
            }
        }
    }

    /// `for V := lo to|downto hi do S`
    fn lower_for(&mut self, s: &liminal_parser::ast::stmt::ForStmt) {
        let Some(var) = s.var() else { return };
        let descending = s.descending();

        if let Some(init) = s.init() {
            let lo = self.lower_expr(&init);
            self.f.emit_store_var(&var, lo);
        }
        let loop_lbl = self.f.fresh_label("for");
        let step_lbl = self.f.fresh_label("forstep");
        let end = self.f.fresh_label("endfor");

        self.f.emit_label(&loop_lbl);
        let v = self.f.emit_load_var(&var);
        let hi = match s.limit() {
            Some(limit) => self.lower_expr(&limit),
            None => self.f.emit_const_int(0),
        };
        let cmp_op = if descending { Opcode::Ge } else { Opcode::Le };
        let c = self.f.emit_binop(cmp_op, v, hi);
        self.f.emit_jump_if_false(c, &end);

        self.loops.push((step_lbl.clone(), end.clone()));
        if let Some(body) = s.body() {
            self.lower_stmt(&body);
        }
        self.loops.pop();

        self.f.emit_label(&step_lbl);
        let v2 = self.f.emit_load_var(&var);
        let one = self.f.emit_const_int(1);
        let step_op = if descending { Opcode::Sub } else { Opcode::Add };
        let v3 = self.f.emit_binop(step_op, v2, one);
        self.f.emit_store_var(&var, v3);
        self.f.emit_jump(&loop_lbl);
        self.f.emit_label(&end);
    }

    /// `for V in A do S` over the flattened array `A.0 .. A.len`.
    fn lower_for_in(&mut self, s: &liminal_parser::ast::stmt::ForInStmt) {
        let Some(var) = s.var() else { return };
        let Some(base) = s.iterable().and_then(|e| flat_path(&e)) else {
            // Only variables iterate; anything else has no element names.
            if let Some(iterable) = s.iterable() {
                self.lower_expr(&iterable);
            }
            return;
        };

        let idx_var = self.hidden_name("idx");
        let zero = self.f.emit_const_int(0);
        self.f.emit_store_var(&idx_var, zero);

        let loop_lbl = self.f.fresh_label("forin");
        let step_lbl = self.f.fresh_label("forinstep");
        let end = self.f.fresh_label("endforin");

        self.f.emit_label(&loop_lbl);
        let i = self.f.emit_load_var(&idx_var);
        let len = self.f.emit_load_var(&format!("{base}.len"));
        let c = self.f.emit_binop(Opcode::Lt, i, len);
        self.f.emit_jump_if_false(c, &end);
        let elem = self.f.emit_index(&base, i);
        self.f.emit_store_var(&var, elem);

        self.loops.push((step_lbl.clone(), end.clone()));
        if let Some(body) = s.body() {
            self.lower_stmt(&body);
        }
        self.loops.pop();

        self.f.emit_label(&step_lbl);
        let i2 = self.f.emit_load_var(&idx_var);
        let one = self.f.emit_const_int(1);
        let i3 = self.f.emit_binop(Opcode::Add, i2, one);
        self.f.emit_store_var(&idx_var, i3);
        self.f.emit_jump(&loop_lbl);
        self.f.emit_label(&end);
    }

    /// `case E of pat: S; ... else: S end`. Constructor patterns `Ok(v)`
    /// and `Err(v)` unwrap and bind; all other patterns compare for
    /// equality.
    fn lower_case(&mut self, s: &liminal_parser::ast::stmt::CaseStmt) {
        let Some(scrutinee) = s.scrutinee() else { return };
        let scrut_var = self.hidden_name("case");
        let sv = self.lower_expr(&scrutinee);
        self.f.emit_store_var(&scrut_var, sv);

        let end = self.f.fresh_label("endcase");
        let arms: Vec<_> = s.arms().collect();
        for arm in &arms {
            let (Some(pattern), Some(body)) = (arm.pattern(), arm.body()) else {
                continue;
            };
            let next = self.f.fresh_label("arm");
            match constructor_pattern(&pattern) {
                Some((ResultArm::Ok, binding)) => {
                    let sc = self.f.emit_load_var(&scrut_var);
                    let ok = self.f.emit_result_is_ok(sc);
                    self.f.emit_jump_if_false(ok, &next);
                    if let Some(binding) = binding {
                        let text = self.f.emit_result_unwrap(sc, NO_SLOT);
                        self.f.emit_store_var(&binding, text);
                    }
                    self.lower_stmt(&body);
                    self.f.emit_jump(&end);
                }
                Some((ResultArm::Err, binding)) => {
                    let sc = self.f.emit_load_var(&scrut_var);
                    let ok = self.f.emit_result_is_ok(sc);
                    let body_lbl = self.f.fresh_label("errarm");
                    self.f.emit_jump_if_false(ok, &body_lbl);
                    self.f.emit_jump(&next);
                    self.f.emit_label(&body_lbl);
                    if let Some(binding) = binding {
                        let reason = self.f.emit_result_unwrap_err(sc);
                        self.f.emit_store_var(&binding, reason);
                    }
                    self.lower_stmt(&body);
                    self.f.emit_jump(&end);
                }
                None => {
                    let sc = self.f.emit_load_var(&scrut_var);
                    let pv = self.lower_expr(&pattern);
                    let eq = self.f.emit_binop(Opcode::Eq, sc, pv);
                    self.f.emit_jump_if_false(eq, &next);
                    self.lower_stmt(&body);
                    self.f.emit_jump(&end);
                }
            }
            self.f.emit_label(&next);
        }
        if let Some(else_arm) = s.else_arm() {
            if let Some(body) = else_arm.body() {
                self.lower_stmt(&body);
            }
        }
        self.f.emit_label(&end);
    }

    // ── Expressions ────────────────────────────────────────────────────

    /// Lower an expression in statement position, where built-in IO calls
    /// need no destination slot.
    fn lower_expr_discard(&mut self, expr: &Expr) {
        if let Expr::Call(call) = expr {
            self.lower_call(call, false);
            return;
        }
        self.lower_expr(expr);
    }

    fn lower_expr(&mut self, expr: &Expr) -> i32 {
        match expr {
            Expr::Literal(lit) => self.lower_literal(lit),
            Expr::NameRef(name) => {
                let text = name.text().unwrap_or_default();
                if text.eq_ignore_ascii_case("Nothing") {
                    return self.f.emit_const_none();
                }
                if let Some(&index) = self.ctx.enum_consts.get(&text) {
                    return self.f.emit_const_int(index);
                }
                self.f.emit_load_var(&text)
            }
            Expr::Paren(p) => match p.inner() {
                Some(inner) => self.lower_expr(&inner),
                None => self.f.emit_const_int(0),
            },
            Expr::Unary(u) => {
                let Some(operand) = u.operand() else {
                    return self.f.emit_const_int(0);
                };
                match u.op().map(|t| t.kind()) {
                    Some(SyntaxKind::MINUS) => {
                        let zero = self.f.emit_const_int(0);
                        let v = self.lower_expr(&operand);
                        self.f.emit_binop(Opcode::Sub, zero, v)
                    }
                    Some(SyntaxKind::NOT_KW) => {
                        let v = self.lower_expr(&operand);
                        let falsy = self.f.emit_const_bool(false);
                        self.f.emit_binop(Opcode::Eq, v, falsy)
                    }
                    _ => self.lower_expr(&operand),
                }
            }
            Expr::Binary(b) => {
                let (Some(lhs), Some(rhs)) = (b.lhs(), b.rhs()) else {
                    return self.f.emit_const_int(0);
                };
                let op = match b.op().map(|t| t.kind()) {
                    Some(SyntaxKind::PLUS) => Opcode::Add,
                    Some(SyntaxKind::MINUS) => Opcode::Sub,
                    Some(SyntaxKind::STAR) => Opcode::Mul,
                    Some(SyntaxKind::SLASH) | Some(SyntaxKind::DIV_KW) => Opcode::Div,
                    Some(SyntaxKind::MOD_KW) => Opcode::Mod,
                    Some(SyntaxKind::EQ) => Opcode::Eq,
                    Some(SyntaxKind::NEQ) => Opcode::Neq,
                    Some(SyntaxKind::LT) => Opcode::Lt,
                    Some(SyntaxKind::GT) => Opcode::Gt,
                    Some(SyntaxKind::LE) => Opcode::Le,
                    Some(SyntaxKind::GE) => Opcode::Ge,
                    Some(SyntaxKind::AND_KW) => Opcode::And,
                    Some(SyntaxKind::OR_KW) => Opcode::Or,
                    _ => Opcode::Nop,
                };
                let l = self.lower_expr(&lhs);
                let r = self.lower_expr(&rhs);
                if op == Opcode::Nop {
                    return l;
                }
                self.f.emit_binop(op, l, r)
            }
            Expr::Call(call) => self.lower_call(call, true),
            Expr::Index(idx) => {
                let base = idx.base().and_then(|b| flat_path(&b));
                let Some(base) = base else {
                    return self.f.emit_const_int(0);
                };
                let i = match idx.index() {
                    Some(index) => self.lower_expr(&index),
                    None => self.f.emit_const_int(0),
                };
                self.f.emit_index(&base, i)
            }
            Expr::Field(_) => match flat_path(expr) {
                Some(path) => self.f.emit_load_var(&path),
                None => self.f.emit_const_int(0),
            },
            // Composite literals only materialize through assignment
            // flattening; in value position they contribute nothing.
            Expr::Tuple(_) | Expr::Array(_) | Expr::Record(_) => self.f.emit_const_int(0),
            Expr::FString(s) => {
                let mut acc: Option<i32> = None;
                for part in s.parts() {
                    let slot = match part {
                        StringPart::Content(token) => {
                            let text = decode_escapes(token.text());
                            self.f.emit_const_string(&text)
                        }
                        StringPart::Interpolation(interp) => match interp.expr() {
                            Some(e) => self.lower_expr(&e),
                            None => continue,
                        },
                    };
                    acc = Some(match acc {
                        None => slot,
                        Some(prev) => self.f.emit_concat(prev, slot),
                    });
                }
                acc.unwrap_or_else(|| self.f.emit_const_string(""))
            }
            Expr::Ask(ask) => {
                let prompt = match ask.input() {
                    Some(input) => self.lower_expr(&input),
                    None => self.f.emit_const_string(""),
                };
                let fallback = match ask.fallback() {
                    Some(fb) => self.lower_expr(&fb),
                    None => NO_SLOT,
                };
                let oracle = ask.oracle().and_then(|o| o.text()).unwrap_or_default();
                let schema = ask.into_ty().and_then(|t| self.schema_name(&t));
                self.f.emit_ask(prompt, fallback, &oracle, schema.as_deref())
            }
            Expr::Consult(consult) => self.lower_consult(consult),
            // No embed opcode exists; the call is elided.
            Expr::Embed(embed) => {
                if let Some(input) = embed.input() {
                    self.lower_expr(&input);
                }
                self.f.emit_const_string("")
            }
        }
    }

    fn lower_literal(&mut self, lit: &liminal_parser::ast::expr::Literal) -> i32 {
        let Some(token) = lit.token() else {
            return self.f.emit_const_int(0);
        };
        let text = token.text().to_string();
        match token.kind() {
            SyntaxKind::INT_LITERAL => {
                let value = text.parse::<i64>().unwrap_or(0);
                self.f.emit_const_int(value)
            }
            SyntaxKind::REAL_LITERAL => {
                let value = text.parse::<f64>().unwrap_or(0.0);
                self.f.emit_const_real(value)
            }
            SyntaxKind::STRING_LITERAL | SyntaxKind::CHAR_LITERAL | SyntaxKind::BYTES_LITERAL => {
                let value = unescape_string(&text);
                self.f.emit_const_string(&value)
            }
            SyntaxKind::DURATION_LITERAL => self.f.emit_const_int(duration_millis(&text)),
            SyntaxKind::MONEY_LITERAL => {
                let value = text.trim_start_matches('$').parse::<f64>().unwrap_or(0.0);
                self.f.emit_const_real(value)
            }
            SyntaxKind::TRUE_KW => self.f.emit_const_bool(true),
            SyntaxKind::FALSE_KW => self.f.emit_const_bool(false),
            _ => self.f.emit_const_int(0),
        }
    }

    /// Lower a call. Built-ins map to dedicated opcodes; anything else is a
    /// user function call with up to two arguments. When `want_value` is
    /// false and the call has no natural result, no dummy slot is emitted.
    fn lower_call(&mut self, call: &CallExpr, want_value: bool) -> i32 {
        let args = call.args();

        // Result method calls: R.UnwrapOr(x), R.IsOk(), R.UnwrapErr().
        if let Some(Expr::Field(fa)) = call.callee() {
            let method = fa
                .field()
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            let base = match fa.base() {
                Some(base) => self.lower_expr(&base),
                None => self.f.emit_const_int(0),
            };
            if method.eq_ignore_ascii_case("UnwrapOr") {
                let fb = match args.first() {
                    Some(arg) => self.lower_expr(arg),
                    None => NO_SLOT,
                };
                return self.f.emit_result_unwrap(base, fb);
            }
            if method.eq_ignore_ascii_case("IsOk") {
                return self.f.emit_result_is_ok(base);
            }
            if method.eq_ignore_ascii_case("UnwrapErr") {
                return self.f.emit_result_unwrap_err(base);
            }
            return base;
        }

        let name = match call.callee() {
            Some(Expr::NameRef(n)) => n.text().unwrap_or_default(),
            _ => String::new(),
        };

        if name.eq_ignore_ascii_case("WriteLn") {
            let slot = match args.first() {
                Some(arg) => self.lower_expr(arg),
                None => NO_SLOT,
            };
            self.f.emit_println(slot);
            return self.void_result(want_value);
        }
        if name.eq_ignore_ascii_case("Write") {
            if let Some(arg) = args.first() {
                let slot = self.lower_expr(arg);
                self.f.emit_print(slot);
            }
            return self.void_result(want_value);
        }
        if name.eq_ignore_ascii_case("ReadLn") {
            if let Some(Expr::NameRef(target)) = args.first() {
                if let Some(var) = target.text() {
                    self.f.emit_readln(&var);
                }
            }
            return self.void_result(want_value);
        }
        if name.eq_ignore_ascii_case("ReadFile") {
            let path = match args.first() {
                Some(arg) => self.lower_expr(arg),
                None => self.f.emit_const_string(""),
            };
            return self.f.emit_read_file(path);
        }
        if name.eq_ignore_ascii_case("WriteFile") {
            if args.len() >= 2 {
                let path = self.lower_expr(&args[0]);
                let content = self.lower_expr(&args[1]);
                self.f.emit_write_file(path, content);
            }
            return self.void_result(want_value);
        }
        if name.eq_ignore_ascii_case("Ok") && args.len() == 1 {
            let v = self.lower_expr(&args[0]);
            return self.f.emit_make_result_ok(v);
        }
        if name.eq_ignore_ascii_case("Err") && args.len() == 1 {
            let v = self.lower_expr(&args[0]);
            return self.f.emit_make_result_err(v);
        }
        if name.eq_ignore_ascii_case("Ask") {
            let prompt = match args.first() {
                Some(arg) => self.lower_expr(arg),
                None => self.f.emit_const_string(""),
            };
            return self.f.emit_ask(prompt, NO_SLOT, "", None);
        }

        let a0 = match args.first() {
            Some(arg) => self.lower_expr(arg),
            None => NO_SLOT,
        };
        let a1 = match args.get(1) {
            Some(arg) => self.lower_expr(arg),
            None => NO_SLOT,
        };
        self.f.emit_call(&name, a0, a1)
    }

    fn void_result(&mut self, want_value: bool) -> i32 {
        if want_value {
            self.f.emit_const_int(0)
        } else {
            NO_SLOT
        }
    }

    /// The consult retry loop.
    ///
    /// Prompt, remaining attempts, and the latest result live in hidden
    /// locals. Each pass asks with the current prompt; success jumps to
    /// done, failure decrements attempts (exhaustion jumps to done) and, if
    /// a hint is given, appends `"\n\nHint: " + hint` to the prompt before
    /// looping. A fallback coerces the final result.
    fn lower_consult(&mut self, consult: &ConsultExpr) -> i32 {
        let prompt_var = self.hidden_name("consult_prompt");
        let attempts_var = self.hidden_name("consult_attempts");
        let result_var = self.hidden_name("consult_result");

        let p0 = match consult.input() {
            Some(input) => self.lower_expr(&input),
            None => self.f.emit_const_string(""),
        };
        self.f.emit_store_var(&prompt_var, p0);
        let attempts = self.f.emit_const_int(consult.attempts().max(1));
        self.f.emit_store_var(&attempts_var, attempts);

        let oracle = consult.oracle().and_then(|o| o.text()).unwrap_or_default();
        let schema = consult.into_ty().and_then(|t| self.schema_name(&t));

        let loop_lbl = self.f.fresh_label("consult");
        let fail_lbl = self.f.fresh_label("consultfail");
        let done = self.f.fresh_label("consultdone");

        self.f.emit_label(&loop_lbl);
        let prompt = self.f.emit_load_var(&prompt_var);
        let result = self
            .f
            .emit_ask(prompt, NO_SLOT, &oracle, schema.as_deref());
        self.f.emit_store_var(&result_var, result);
        let ok = self.f.emit_result_is_ok(result);
        self.f.emit_jump_if_false(ok, &fail_lbl);
        self.f.emit_jump(&done);

        self.f.emit_label(&fail_lbl);
        let a = self.f.emit_load_var(&attempts_var);
        let one = self.f.emit_const_int(1);
        let a2 = self.f.emit_binop(Opcode::Sub, a, one);
        self.f.emit_store_var(&attempts_var, a2);
        let a3 = self.f.emit_load_var(&attempts_var);
        let zero = self.f.emit_const_int(0);
        let more = self.f.emit_binop(Opcode::Gt, a3, zero);
        self.f.emit_jump_if_false(more, &done);
        if let Some(hint) = consult.hint() {
            let current = self.f.emit_load_var(&prompt_var);
            let marker = self.f.emit_const_string("\n\nHint: ");
            let with_marker = self.f.emit_concat(current, marker);
            let hint_slot = self.lower_expr(&hint);
            let revised = self.f.emit_concat(with_marker, hint_slot);
            self.f.emit_store_var(&prompt_var, revised);
        }
        self.f.emit_jump(&loop_lbl);

        self.f.emit_label(&done);
        let final_result = self.f.emit_load_var(&result_var);
        match consult.fallback() {
            Some(fb) => {
                let fb_slot = self.lower_expr(&fb);
                self.f.emit_result_or_fallback(final_result, fb_slot)
            }
            None => final_result,
        }
    }

    /// The schema name of an `into` target, when it names a declared schema.
    fn schema_name(&self, ty: &ast_ty::Type) -> Option<String> {
        if let ast_ty::Type::Ref(r) = ty {
            let name = r.name()?;
            if self.ctx.schema_names.contains(&name) {
                return Some(name);
            }
        }
        None
    }
}

/// Which Result constructor a case pattern uses.
enum ResultArm {
    Ok,
    Err,
}

/// Recognize `Ok(v)` / `Err(v)` constructor patterns; the binding is the
/// argument name when it is a plain identifier.
fn constructor_pattern(pattern: &Expr) -> Option<(ResultArm, Option<String>)> {
    let Expr::Call(call) = pattern else { return None };
    let Some(Expr::NameRef(callee)) = call.callee() else {
        return None;
    };
    let name = callee.text()?;
    let arm = if name.eq_ignore_ascii_case("Ok") {
        ResultArm::Ok
    } else if name.eq_ignore_ascii_case("Err") {
        ResultArm::Err
    } else {
        return None;
    };
    let binding = match call.args().first() {
        Some(Expr::NameRef(arg)) => arg.text(),
        _ => None,
    };
    Some((arm, binding))
}

/// Flatten an identifier/field chain into a dotted name: `P.Name.First`.
fn flat_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::NameRef(name) => name.text(),
        Expr::Field(fa) => {
            let base = flat_path(&fa.base()?)?;
            let field = fa.field()?.text().to_string();
            Some(format!("{base}.{field}"))
        }
        _ => None,
    }
}

/// An integer literal's value, when the expression is one.
fn int_literal(expr: &Expr) -> Option<i64> {
    let Expr::Literal(lit) = expr else { return None };
    let token = lit.token()?;
    if token.kind() == SyntaxKind::INT_LITERAL {
        token.text().parse().ok()
    } else {
        None
    }
}

/// Milliseconds of a duration lexeme (`500ms`, `5s`, `3m`, `2h`).
fn duration_millis(text: &str) -> i64 {
    let (digits, factor) = if let Some(d) = text.strip_suffix("ms") {
        (d, 1)
    } else if let Some(d) = text.strip_suffix('s') {
        (d, 1000)
    } else if let Some(d) = text.strip_suffix('m') {
        (d, 60_000)
    } else if let Some(d) = text.strip_suffix('h') {
        (d, 3_600_000)
    } else {
        (text, 1)
    };
    digits.parse::<i64>().unwrap_or(0) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_conversions() {
        assert_eq!(duration_millis("500ms"), 500);
        assert_eq!(duration_millis("5s"), 5000);
        assert_eq!(duration_millis("3m"), 180_000);
        assert_eq!(duration_millis("2h"), 7_200_000);
    }
}
