//! Integration tests for the Liminal parser: tree shapes, typed accessors,
//! and error recovery.

use liminal_parser::ast::expr::Expr;
use liminal_parser::ast::stmt::Stmt;
use liminal_parser::ast::ty::Type;
use liminal_parser::{parse, SyntaxKind};

#[test]
fn hello_world_parses_cleanly() {
    let source = "program H; begin WriteLn('Hello, World!'); end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let prog = p.program();
    assert_eq!(prog.name().as_deref(), Some("H"));
    let body = prog.body().expect("main body");
    let stmts: Vec<_> = body.stmts().collect();
    assert_eq!(stmts.len(), 1);
    assert!(matches!(stmts[0], Stmt::ExprStmt(_)));
}

#[test]
fn cst_is_lossless() {
    let source = "program H;  // comment\nbegin\n  WriteLn('x');\nend.";
    let p = parse(source);
    assert_eq!(p.syntax().text().to_string(), source);
}

#[test]
fn sections_are_collected() {
    let source = "\
program Demo;
uses Foo, Bar;
config
  retries = 3;
types
  Age = Integer;
  schema Person
    Name: String;
    Age: Integer describe 'years';
  end;
oracles
  O: String = 'mock';
var
  X, Y: Integer;
  Msg: String := 'hi';
begin
  X := 1;
end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let prog = p.program();
    assert_eq!(prog.use_clauses().count(), 1);
    assert_eq!(prog.config_items().count(), 1);
    assert_eq!(prog.type_decls().count(), 2);
    assert_eq!(prog.oracle_decls().count(), 1);
    assert_eq!(prog.var_decls().count(), 2);

    let vars: Vec<_> = prog.var_decls().collect();
    assert_eq!(vars[0].names(), vec!["X", "Y"]);
    assert!(vars[0].init().is_none());
    assert_eq!(vars[1].names(), vec!["Msg"]);
    assert!(vars[1].init().is_some());

    let schema_decl = prog.type_decls().nth(1).unwrap();
    assert_eq!(schema_decl.name().as_deref(), Some("Person"));
    match schema_decl.ty() {
        Some(Type::Schema(s)) => {
            let fields: Vec<_> = s.fields().collect();
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name().as_deref(), Some("Name"));
            assert!(fields[0].describe().is_none());
            assert_eq!(fields[1].describe().unwrap().text(), "'years'");
        }
        other => panic!("expected schema type, got {other:?}"),
    }
}

#[test]
fn function_declaration_shape() {
    let source = "\
program F;
function Add(A, B: Integer): Integer;
var
  T: Integer;
begin
  T := A + B;
  Result := T;
end;
begin
  WriteLn(Add(1, 2));
end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let f = p.program().functions().next().expect("one function");
    assert_eq!(f.name().as_deref(), Some("Add"));
    assert_eq!(f.param_names(), vec!["A", "B"]);
    assert!(matches!(f.result_ty(), Some(Type::Ref(_))));
    assert!(f.var_block().is_some());
    assert_eq!(f.body().unwrap().stmts().count(), 2);
}

#[test]
fn ask_with_all_clauses() {
    let source =
        "program A; begin R := ask O <- 'hi' into Person else 'fallback' with cost; end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let body = p.program().body().unwrap();
    let Some(Stmt::Assign(assign)) = body.stmts().next() else {
        panic!("expected assignment");
    };
    let Some(Expr::Ask(ask)) = assign.value() else {
        panic!("expected ask expression");
    };
    assert_eq!(ask.oracle().unwrap().text().as_deref(), Some("O"));
    assert!(matches!(ask.input(), Some(Expr::Literal(_))));
    assert!(ask.into_ty().is_some());
    assert!(ask.fallback().is_some());
    assert!(ask.with_cost());
}

#[test]
fn consult_with_retry_and_yield() {
    let source = "\
program C;
begin
  R := consult O from 'p' into Person with attempts: 2
       on failure retry with hint 'Fix'; yield 'fb' end;
end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let body = p.program().body().unwrap();
    let Some(Stmt::Assign(assign)) = body.stmts().next() else {
        panic!("expected assignment");
    };
    let Some(Expr::Consult(consult)) = assign.value() else {
        panic!("expected consult expression");
    };
    assert_eq!(consult.attempts(), 2);
    assert!(consult.hint().is_some());
    assert!(consult.fallback().is_some());
    assert!(consult.into_ty().is_some());
}

#[test]
fn consult_attempts_defaults_to_one() {
    let source = "program C; begin R := consult O from 'p'; end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());
    let body = p.program().body().unwrap();
    let Some(Stmt::Assign(assign)) = body.stmts().next() else {
        panic!("expected assignment");
    };
    let Some(Expr::Consult(consult)) = assign.value() else {
        panic!("expected consult expression");
    };
    assert_eq!(consult.attempts(), 1);
    assert!(consult.hint().is_none());
    assert!(consult.fallback().is_none());
}

#[test]
fn fstring_builds_interpolation_segments() {
    let source = "program F; begin WriteLn(f'sum is {A + B}!'); end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let root = p.syntax();
    let string_expr = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::STRING_EXPR)
        .expect("string expr node");
    let interp_count = string_expr
        .children()
        .filter(|n| n.kind() == SyntaxKind::INTERPOLATION)
        .count();
    assert_eq!(interp_count, 1);
}

#[test]
fn operator_precedence() {
    // `1 + 2 * 3` parses as `1 + (2 * 3)`.
    let source = "program P; begin X := 1 + 2 * 3; end.";
    let p = parse(source);
    assert!(p.ok());

    let body = p.program().body().unwrap();
    let Some(Stmt::Assign(assign)) = body.stmts().next() else {
        panic!("expected assignment");
    };
    let Some(Expr::Binary(add)) = assign.value() else {
        panic!("expected binary expression");
    };
    assert_eq!(add.op().unwrap().kind(), SyntaxKind::PLUS);
    let Some(Expr::Binary(mul)) = add.rhs() else {
        panic!("expected nested multiplication");
    };
    assert_eq!(mul.op().unwrap().kind(), SyntaxKind::STAR);
}

#[test]
fn case_with_result_patterns() {
    let source = "\
program K;
begin
  case R of
    Ok(V): WriteLn(V);
    Err(E): WriteLn(E);
    else: WriteLn('none');
  end;
end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let body = p.program().body().unwrap();
    let Some(Stmt::Case(case)) = body.stmts().next() else {
        panic!("expected case statement");
    };
    assert_eq!(case.arms().count(), 2);
    assert!(case.else_arm().is_some());
}

#[test]
fn for_loop_direction_bit() {
    let up = parse("program P; begin for I := 1 to 3 do WriteLn(I); end.");
    assert!(up.ok());
    let body = up.program().body().unwrap();
    let Some(Stmt::For(f)) = body.stmts().next() else {
        panic!("expected for statement");
    };
    assert!(!f.descending());
    assert_eq!(f.var().as_deref(), Some("I"));

    let down = parse("program P; begin for I := 3 downto 1 do WriteLn(I); end.");
    assert!(down.ok());
    let body = down.program().body().unwrap();
    let Some(Stmt::For(f)) = body.stmts().next() else {
        panic!("expected for statement");
    };
    assert!(f.descending());
}

#[test]
fn enum_vs_tuple_type() {
    let source = "\
program T;
types
  Color = (Red, Green, Blue);
  Pair = (Integer, ?String);
begin
end.";
    let p = parse(source);
    assert!(p.ok(), "errors: {:?}", p.errors());

    let decls: Vec<_> = p.program().type_decls().collect();
    match decls[0].ty() {
        Some(Type::Enum(e)) => assert_eq!(e.variants(), vec!["Red", "Green", "Blue"]),
        other => panic!("expected enum, got {other:?}"),
    }
    assert!(matches!(decls[1].ty(), Some(Type::Tuple(_))));
}

#[test]
fn errors_are_collected_and_parse_continues() {
    // Missing `then` and a stray token; both reported, tree still produced.
    let source = "program E; begin if X WriteLn(1); @ Y := 2; end.";
    let p = parse(source);
    assert!(!p.ok());
    assert!(p.errors().len() >= 2, "errors: {:?}", p.errors());
    // The tree still reflects the trailing assignment.
    let assigns = p
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::ASSIGN_STMT)
        .count();
    assert!(assigns >= 1);
}

#[test]
fn parser_terminates_on_garbage() {
    for source in ["", "program", "begin begin begin", "@@@@@", "program X; begin"] {
        let p = parse(source);
        // Must terminate and produce a root node.
        assert_eq!(p.syntax().kind(), SyntaxKind::SOURCE_FILE);
    }
}

#[test]
fn error_spans_point_into_source() {
    let source = "program E; begin X := ; end.";
    let p = parse(source);
    assert!(!p.ok());
    let err = &p.errors()[0];
    assert!((err.span.start as usize) < source.len());
}
