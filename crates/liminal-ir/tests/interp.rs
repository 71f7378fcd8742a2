//! Integration tests: lower real programs and run them against mock
//! oracles and in-memory streams.

use liminal_ir::{execute, lower, validate, Program};
use liminal_rt::oracle::mock::MockOracle;
use liminal_rt::oracle::{Oracle, OracleReply};

/// Parse, check, and lower a source program.
fn compile(source: &str) -> Program {
    let parse = liminal_parser::parse(source);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    let typeck = liminal_typeck::check(&parse);
    assert!(typeck.ok(), "type errors: {:?}", typeck.errors);
    let prog = lower(&parse, &typeck);
    validate(&prog).expect("lowered IR must validate");
    prog
}

/// Run a compiled program, returning stdout.
fn run_with(prog: &Program, input: &str, oracle: &mut dyn Oracle) -> String {
    let mut reader = std::io::BufReader::new(input.as_bytes());
    let mut out: Vec<u8> = Vec::new();
    execute(prog, &mut reader, &mut out, oracle).expect("execution failed");
    String::from_utf8(out).expect("output must be UTF-8")
}

fn run(source: &str, input: &str) -> String {
    let prog = compile(source);
    let mut oracle = MockOracle::new();
    run_with(&prog, input, &mut oracle)
}

/// An oracle that records every prompt it is asked.
struct ProbeOracle {
    replies: MockOracle,
    prompts: Vec<String>,
}

impl ProbeOracle {
    fn new(replies: MockOracle) -> Self {
        Self {
            replies,
            prompts: Vec::new(),
        }
    }
}

impl Oracle for ProbeOracle {
    fn call_text(&mut self, prompt: &str) -> OracleReply {
        self.prompts.push(prompt.to_string());
        self.replies.call_text(prompt)
    }
}

// ── Basic execution ──────────────────────────────────────────────────────

#[test]
fn hello_world() {
    let out = run("program H; begin WriteLn('Hello, World!'); end.", "");
    assert_eq!(out, "Hello, World!\n");
}

#[test]
fn read_add() {
    let out = run(
        "program Sum;
var
  X, Y: Integer;
begin
  ReadLn(X);
  ReadLn(Y);
  WriteLn(f'Sum: {X + Y}');
end.",
        "3\n4\n",
    );
    assert!(out.contains("Sum: 7"), "output was {out:?}");
}

#[test]
fn arithmetic_and_precedence() {
    let out = run(
        "program A; begin WriteLn(1 + 2 * 3); WriteLn(7 div 2); WriteLn(7 mod 2); end.",
        "",
    );
    assert_eq!(out, "7\n3\n1\n");
}

#[test]
fn real_widening_prints_shortest_form() {
    let out = run(
        "program R;
var
  X: Real;
begin
  X := 1 + 1.5;
  WriteLn(X);
  X := 7 / 3.5;
  WriteLn(X);
end.",
        "",
    );
    assert_eq!(out, "2.5\n2\n");
}

#[test]
fn if_else_branches() {
    let out = run(
        "program B;
var
  X: Integer;
begin
  X := 3;
  if X > 2 then WriteLn('big') else WriteLn('small');
  if X > 5 then WriteLn('big') else WriteLn('small');
end.",
        "",
    );
    assert_eq!(out, "big\nsmall\n");
}

#[test]
fn while_loop() {
    let out = run(
        "program W;
var
  I: Integer;
begin
  I := 0;
  while I < 3 do
  begin
    WriteLn(I);
    I := I + 1;
  end;
end.",
        "",
    );
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn repeat_until() {
    let out = run(
        "program R;
var
  I: Integer;
begin
  I := 0;
  repeat
    WriteLn(I);
    I := I + 1;
  until I >= 3;
end.",
        "",
    );
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn for_up_and_down() {
    let out = run(
        "program F;
begin
  for I := 1 to 3 do Write(I);
  WriteLn('');
  for J := 3 downto 1 do Write(J);
  WriteLn('');
end.",
        "",
    );
    assert_eq!(out, "123\n321\n");
}

#[test]
fn function_call_with_implicit_result_return() {
    let out = run(
        "program F;
function Add(A, B: Integer): Integer;
begin
  Result := A + B;
end;
begin
  WriteLn(Add(2, 5));
end.",
        "",
    );
    assert_eq!(out, "7\n");
}

#[test]
fn function_explicit_return() {
    let out = run(
        "program F;
function Pick(A, B: Integer): Integer;
begin
  if A > B then return A;
  return B;
end;
begin
  WriteLn(Pick(9, 4));
end.",
        "",
    );
    assert_eq!(out, "9\n");
}

#[test]
fn fstring_interpolation() {
    let out = run(
        "program S;
var
  A, B: Integer;
begin
  A := 3;
  B := 4;
  WriteLn(f'sum is {A + B}!');
end.",
        "",
    );
    assert_eq!(out, "sum is 7!\n");
}

#[test]
fn array_literal_and_for_in() {
    let out = run(
        "program A;
var
  Nums: array of Integer;
  Total: Integer;
begin
  Nums := [10, 20, 30];
  Total := 0;
  for N in Nums do Total := Total + N;
  WriteLn(Total);
end.",
        "",
    );
    assert_eq!(out, "60\n");
}

#[test]
fn array_index_load() {
    let out = run(
        "program A;
var
  Nums: array of Integer;
begin
  Nums := [5, 6, 7];
  WriteLn(Nums[1]);
  WriteLn(Nums[0] + Nums[2]);
end.",
        "",
    );
    assert_eq!(out, "6\n12\n");
}

#[test]
fn record_field_paths() {
    let out = run(
        "program P;
types
  Person = record
    Name: String;
    Age: Integer;
  end;
var
  P: Person;
begin
  P.Name := 'Ada';
  P.Age := 36;
  WriteLn(f'{P.Name} is {P.Age}');
end.",
        "",
    );
    assert_eq!(out, "Ada is 36\n");
}

#[test]
fn record_literal_assignment_flattens() {
    let out = run(
        "program P;
types
  Person = record
    Name: String;
    Age: Integer;
  end;
var
  P: Person;
begin
  P := {Name: 'Bob', Age: 30};
  WriteLn(P.Name);
  WriteLn(P.Age);
end.",
        "",
    );
    assert_eq!(out, "Bob\n30\n");
}

#[test]
fn enum_variants_lower_to_indices() {
    let out = run(
        "program E;
types
  Color = (Red, Green, Blue);
var
  C: Color;
begin
  C := Blue;
  WriteLn(C);
  if C = 2 then WriteLn('blue');
end.",
        "",
    );
    assert_eq!(out, "2\nblue\n");
}

#[test]
fn break_and_continue() {
    let out = run(
        "program L;
var
  I: Integer;
begin
  I := 0;
  loop
    I := I + 1;
    if I = 2 then continue;
    if I > 4 then break;
    WriteLn(I);
  end;
end.",
        "",
    );
    assert_eq!(out, "1\n3\n4\n");
}

#[test]
fn string_comparison_in_case() {
    let out = run(
        "program C;
var
  Word: String;
begin
  Word := 'two';
  case Word of
    'one': WriteLn(1);
    'two': WriteLn(2);
    else: WriteLn(0);
  end;
end.",
        "",
    );
    assert_eq!(out, "2\n");
}

// ── Oracle execution ─────────────────────────────────────────────────────

#[test]
fn ask_ok() {
    let prog = compile(
        "program A;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi';
  WriteLn(R);
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_text("hi");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "Ok(hi)\n");
}

#[test]
fn ask_err_without_fallback() {
    let prog = compile(
        "program A;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi';
  WriteLn(R);
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_error("boom");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "Err(boom)\n");
}

#[test]
fn ask_else_fallback() {
    let prog = compile(
        "program A;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi' else 'fallback';
  WriteLn(R);
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_error("boom");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "Ok(fallback)\n");
}

#[test]
fn ask_unwrap_or() {
    let prog = compile(
        "program A;
oracles
  O: String = 'mock';
var
  R: String;
  S: String;
begin
  R := ask O <- 'hi';
  S := R.UnwrapOr('fb');
  WriteLn(S);
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_error("boom");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "fb\n");
}

const PERSON_PROGRAM: &str = "program A;
types
  schema Person
    Name: String;
    Age: Integer;
  end;
oracles
  O: String = 'mock';
var
  R: Person;
begin
  R := ask O <- 'extract' into Person;
  WriteLn(R);
end.";

#[test]
fn ask_into_schema_valid() {
    let prog = compile(PERSON_PROGRAM);
    let mut oracle = MockOracle::new();
    oracle.queue_text(r#"{"Name":"Bob","Age":30}"#);
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "Ok({\"Name\":\"Bob\",\"Age\":30})\n");
}

#[test]
fn ask_into_schema_invalid() {
    let prog = compile(PERSON_PROGRAM);
    let mut oracle = MockOracle::new();
    oracle.queue_text(r#"{"Name":123,"Age":"x"}"#);
    let out = run_with(&prog, "", &mut oracle);
    assert!(out.starts_with("Err("), "output was {out:?}");
}

#[test]
fn case_on_ask_result() {
    let prog = compile(
        "program C;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi';
  case R of
    Ok(V): WriteLn('got ' + V);
    Err(E): WriteLn('failed ' + E);
  end;
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_text("pong");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "got pong\n");

    let mut failing = MockOracle::new();
    failing.queue_error("boom");
    let out = run_with(&prog, "", &mut failing);
    assert_eq!(out, "failed boom\n");
}

#[test]
fn consult_success_first_try() {
    let prog = compile(
        "program C;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := consult O from 'p';
  WriteLn(R);
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_text("hi");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "Ok(hi)\n");
}

#[test]
fn consult_retry_appends_hint_to_prompt() {
    let prog = compile(
        "program C;
types
  schema Person
    Name: String;
    Age: Integer;
  end;
oracles
  O: String = 'mock';
var
  R: Person;
begin
  R := consult O from 'p' into Person with attempts: 2
       on failure retry with hint 'Fix' end;
  WriteLn(R);
end.",
    );
    let mut replies = MockOracle::new();
    replies.queue_text(r#"{"Name":123,"Age":"x"}"#);
    replies.queue_text(r#"{"Name":"Bob","Age":30}"#);
    let mut probe = ProbeOracle::new(replies);
    let out = run_with(&prog, "", &mut probe);
    assert_eq!(out, "Ok({\"Name\":\"Bob\",\"Age\":30})\n");

    assert_eq!(probe.prompts.len(), 2);
    assert_eq!(probe.prompts[0], "p");
    assert_eq!(probe.prompts[1], "p\n\nHint: Fix");
}

#[test]
fn consult_exhausts_attempts() {
    let prog = compile(
        "program C;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := consult O from 'p' with attempts: 3;
  WriteLn(R);
end.",
    );
    let mut replies = MockOracle::new();
    replies.queue_error("a");
    replies.queue_error("b");
    replies.queue_error("c");
    let mut probe = ProbeOracle::new(replies);
    let out = run_with(&prog, "", &mut probe);
    assert_eq!(probe.prompts.len(), 3);
    assert_eq!(out, "Err(c)\n");
}

#[test]
fn consult_yield_fallback() {
    let prog = compile(
        "program C;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := consult O from 'p' on failure yield 'fb' end;
  WriteLn(R);
end.",
    );
    let mut oracle = MockOracle::new();
    oracle.queue_error("boom");
    let out = run_with(&prog, "", &mut oracle);
    assert_eq!(out, "Ok(fb)\n");
}

// ── Lowering shapes ──────────────────────────────────────────────────────

#[test]
fn hello_ir_listing() {
    let prog = compile("program H; begin WriteLn('Hello, World!'); end.");
    let printed = prog.to_string();
    assert!(printed.contains("func main"));
    assert!(printed.contains("t0 = CONST_STRING \"Hello, World!\""));
    assert!(printed.contains("PRINTLN t0"));
}

#[test]
fn schemas_are_owned_by_the_program() {
    let prog = compile(PERSON_PROGRAM);
    let schema = prog.schemas.get("Person").expect("Person schema in IR");
    assert_eq!(schema.fields.len(), 2);
    let printed = prog.to_string();
    assert!(printed.contains("schemas"));
    assert!(printed.contains("  Person"));
}

#[test]
fn consult_lowering_materializes_the_loop() {
    let prog = compile(
        "program C;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := consult O from 'p' with attempts: 2 on failure retry with hint 'Fix' end;
  WriteLn(R);
end.",
    );
    let printed = prog.to_string();
    assert!(printed.contains("ASK"));
    assert!(printed.contains("RESULT_IS_OK"));
    assert!(printed.contains("JUMP_IF_FALSE"));
    assert!(printed.contains("CONCAT"));
    // The hint marker is a string constant in the loop body.
    assert!(printed.contains("\\n\\nHint: ") || printed.contains("\n\nHint: "));
}

#[test]
fn duration_and_money_literals_lower_to_immediates() {
    let prog = compile(
        "program D;
var
  T: Integer;
  M: Real;
begin
  T := 5s;
  M := $2.50;
end.",
    );
    let printed = prog.to_string();
    assert!(printed.contains("CONST_INT 5000"));
    assert!(printed.contains("CONST_REAL 2.5"));
}
