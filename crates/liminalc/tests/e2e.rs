//! End-to-end tests for the Liminal pipeline.
//!
//! Each test writes a `.lim` source file, runs the full pipeline with
//! in-memory streams and an injected oracle, and asserts the expected
//! output and exit status.

use std::path::PathBuf;

use liminal_rt::oracle::mock::MockOracle;
use liminal_rt::oracle::record::{RecordMode, RecordingOracle};
use liminal_rt::oracle::Oracle;

/// Run a source file through the pipeline; returns (exit code, stdout).
fn run_file(source: &str, input: &str, oracle: Option<Box<dyn Oracle>>) -> (i32, String) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path: PathBuf = dir.path().join("main.lim");
    std::fs::write(&path, source).expect("failed to write source");

    let mut reader = std::io::BufReader::new(input.as_bytes());
    let mut out: Vec<u8> = Vec::new();
    let code = liminalc::run_file(&path, oracle, &mut reader, &mut out);
    (code, String::from_utf8(out).expect("output must be UTF-8"))
}

fn mock_with(replies: &[Result<&str, &str>]) -> Box<dyn Oracle> {
    let mut mock = MockOracle::new();
    for reply in replies {
        match reply {
            Ok(text) => mock.queue_text(*text),
            Err(error) => mock.queue_error(*error),
        }
    }
    Box::new(mock)
}

// ── End-to-end scenarios ─────────────────────────────────────────────────

#[test]
fn hello() {
    let (code, out) = run_file(
        "program H; begin WriteLn('Hello, World!'); end.",
        "",
        Some(mock_with(&[])),
    );
    assert_eq!(code, 0);
    assert_eq!(out, "Hello, World!\n");
}

#[test]
fn read_add() {
    let source = "program Sum;
var
  X, Y: Integer;
begin
  ReadLn(X);
  ReadLn(Y);
  WriteLn(f'Sum: {X + Y}');
end.";
    let (code, out) = run_file(source, "3\n4\n", Some(mock_with(&[])));
    assert_eq!(code, 0);
    assert!(out.contains("Sum: 7"), "output was {out:?}");
}

const ASK_PROGRAM: &str = "program A;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi';
  WriteLn(R);
end.";

#[test]
fn ask_ok() {
    let (code, out) = run_file(ASK_PROGRAM, "", Some(mock_with(&[Ok("hi")])));
    assert_eq!(code, 0);
    assert_eq!(out, "Ok(hi)\n");
}

#[test]
fn ask_else() {
    let source = "program A;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi' else 'fallback';
  WriteLn(R);
end.";
    let (code, out) = run_file(source, "", Some(mock_with(&[Err("boom")])));
    assert_eq!(code, 0);
    assert_eq!(out, "Ok(fallback)\n");
}

const ASK_INTO_PROGRAM: &str = "program A;
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
  R := ask O <- 'Extract the person.' into Person;
  WriteLn(R);
end.";

#[test]
fn ask_into_valid() {
    let (code, out) = run_file(
        ASK_INTO_PROGRAM,
        "",
        Some(mock_with(&[Ok(r#"{"Name":"Bob","Age":30}"#)])),
    );
    assert_eq!(code, 0);
    assert!(out.starts_with("Ok({"), "output was {out:?}");
}

#[test]
fn ask_into_invalid() {
    let (code, out) = run_file(
        ASK_INTO_PROGRAM,
        "",
        Some(mock_with(&[Ok(r#"{"Name":123,"Age":"x"}"#)])),
    );
    assert_eq!(code, 0);
    assert!(out.starts_with("Err("), "output was {out:?}");
}

#[test]
fn consult_retry_records_two_prompts_differing_by_hint() {
    let source = "program C;
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
end.";

    let dir = tempfile::tempdir().unwrap();
    let tape = dir.path().join("tape.jsonl");

    let mut mock = MockOracle::new();
    mock.queue_text(r#"{"Name":123,"Age":"x"}"#);
    mock.queue_text(r#"{"Name":"Bob","Age":30}"#);
    let recorder = RecordingOracle::new(Some(Box::new(mock)), RecordMode::Record, &tape);

    let (code, out) = run_file(source, "", Some(Box::new(recorder)));
    assert_eq!(code, 0);
    assert_eq!(out, "Ok({\"Name\":\"Bob\",\"Age\":30})\n");

    // The tape holds exactly two lines whose canonical prompts differ by
    // the hint suffix on the second.
    let contents = std::fs::read_to_string(&tape).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(first["prompt"], "p");
    assert_eq!(second["prompt"], "p Hint: Fix");
}

// ── Error paths ──────────────────────────────────────────────────────────

#[test]
fn missing_file_exits_nonzero() {
    let mut reader = std::io::BufReader::new(&b""[..]);
    let mut out: Vec<u8> = Vec::new();
    let code = liminalc::run_file(
        std::path::Path::new("/nonexistent/program.lim"),
        Some(mock_with(&[])),
        &mut reader,
        &mut out,
    );
    assert_eq!(code, 1);
}

#[test]
fn parse_error_exits_nonzero() {
    let (code, out) = run_file("program P; begin if then end.", "", Some(mock_with(&[])));
    assert_eq!(code, 1);
    assert_eq!(out, "");
}

#[test]
fn type_error_exits_nonzero() {
    let source = "program T;
var
  X: Integer;
begin
  X := 'text';
end.";
    let (code, out) = run_file(source, "", Some(mock_with(&[])));
    assert_eq!(code, 1);
    assert_eq!(out, "");
}

#[test]
fn oracle_errors_do_not_abort_the_program() {
    // An exhausted mock is an oracle failure, not a crash: the program
    // still runs to completion with an Err value.
    let (code, out) = run_file(ASK_PROGRAM, "", Some(mock_with(&[])));
    assert_eq!(code, 0);
    assert!(out.starts_with("Err("), "output was {out:?}");
}

// ── Pipeline composition ─────────────────────────────────────────────────

#[test]
fn functions_and_control_flow_end_to_end() {
    let source = "program Demo;
function Double(N: Integer): Integer;
begin
  Result := N * 2;
end;
var
  Total: Integer;
begin
  Total := 0;
  for I := 1 to 4 do Total := Total + Double(I);
  WriteLn(Total);
end.";
    let (code, out) = run_file(source, "", Some(mock_with(&[])));
    assert_eq!(code, 0);
    assert_eq!(out, "20\n");
}

#[test]
fn run_source_runs_without_a_file() {
    let mut reader = std::io::BufReader::new(&b""[..]);
    let mut out: Vec<u8> = Vec::new();
    let code = liminalc::run_source(
        "program S; begin WriteLn(1 + 2); end.",
        "inline.lim",
        Some(mock_with(&[])),
        &mut reader,
        &mut out,
    );
    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "3\n");
}
