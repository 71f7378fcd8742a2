//! Integration tests for the type checker: declaration passes, assignment
//! compatibility, and error accumulation.

use liminal_typeck::{check, TypeckResult};

fn check_src(source: &str) -> TypeckResult {
    let parse = liminal_parser::parse(source);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    check(&parse)
}

#[test]
fn hello_world_checks() {
    let result = check_src("program H; begin WriteLn('Hello, World!'); end.");
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn undeclared_identifier_is_reported() {
    let result = check_src("program E; begin WriteLn(Missing); end.");
    assert!(!result.ok());
    assert!(result.errors[0].message.contains("Undeclared identifier Missing"));
}

#[test]
fn errors_accumulate() {
    let result = check_src(
        "program E;
var
  X: Integer;
begin
  WriteLn(A);
  WriteLn(B);
  X := 'text';
end.",
    );
    assert_eq!(result.errors.len(), 3, "errors: {:?}", result.errors);
}

#[test]
fn arithmetic_widens_to_real() {
    let result = check_src(
        "program W;
var
  R: Real;
  I: Integer;
begin
  R := I + 1.5;
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn arithmetic_on_strings_is_rejected() {
    let result = check_src(
        "program A;
var
  X: Integer;
  S: String;
begin
  X := S * 2;
end.",
    );
    assert!(!result.ok());
    assert!(result.errors[0].message.contains("Arithmetic on non-numeric"));
}

#[test]
fn string_plus_char_is_string() {
    let result = check_src(
        "program S;
var
  Msg: String;
begin
  Msg := 'ab' + 'c';
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn string_accepts_char_assignment() {
    let result = check_src(
        "program S;
var
  Msg: String;
begin
  Msg := 'x';
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn assignment_mismatch_is_reported() {
    let result = check_src(
        "program M;
var
  X: Integer;
begin
  X := 'text';
end.",
    );
    assert!(!result.ok());
    assert!(result.errors[0].message.contains("Type mismatch"));
}

#[test]
fn alias_is_transparent_in_assignment() {
    let result = check_src(
        "program A;
types
  Age = Integer;
var
  A: Age;
begin
  A := 30;
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn enum_variants_bind_as_int_constants() {
    let result = check_src(
        "program E;
types
  Color = (Red, Green, Blue);
var
  C: Color;
  N: Integer;
begin
  C := Green;
  N := C;
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn record_fields_type_check_through_dotted_access() {
    let result = check_src(
        "program R;
types
  Point = record
    X: Integer;
    Y: Integer;
  end;
var
  P: Point;
begin
  P.X := 3;
  P.Y := 'no';
end.",
    );
    assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
    assert!(result.errors[0].message.contains("Type mismatch"));
}

#[test]
fn unknown_field_is_reported() {
    let result = check_src(
        "program R;
types
  Point = record
    X: Integer;
  end;
var
  P: Point;
  N: Integer;
begin
  N := P.Z;
end.",
    );
    assert!(!result.ok());
    assert!(result.errors[0].message.contains("Unknown field Z"));
}

#[test]
fn function_result_assignment() {
    let result = check_src(
        "program F;
function Add(A, B: Integer): Integer;
begin
  Result := A + B;
end;
var
  N: Integer;
begin
  N := Add(1, 2);
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn for_loop_binds_counter() {
    let result = check_src(
        "program L;
begin
  for I := 1 to 5 do WriteLn(I);
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn ask_without_into_is_string_typed() {
    let result = check_src(
        "program A;
oracles
  O: String = 'mock';
var
  R: String;
begin
  R := ask O <- 'hi';
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn ask_into_schema_types_as_the_schema() {
    let result = check_src(
        "program A;
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
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn ask_into_schema_rejects_string_target() {
    let result = check_src(
        "program A;
types
  schema Person
    Name: String;
  end;
oracles
  O: String = 'mock';
var
  R: Integer;
begin
  R := ask O <- 'extract' into Person;
end.",
    );
    assert!(!result.ok());
}

#[test]
fn optional_accepts_inner_and_nothing() {
    let result = check_src(
        "program O;
var
  MaybeAge: ?Integer;
begin
  MaybeAge := 30;
  MaybeAge := Nothing;
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn result_accepts_ok_and_err_constructors() {
    let result = check_src(
        "program R;
var
  Out: !String;
begin
  Out := Ok('fine');
  Out := Err('bad');
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn unwrap_or_yields_string() {
    let result = check_src(
        "program U;
oracles
  O: String = 'mock';
var
  R: String;
  S: String;
begin
  R := ask O <- 'hi';
  S := R.UnwrapOr('fb');
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);
}

#[test]
fn schema_table_feeds_json_emission() {
    let result = check_src(
        "program S;
types
  schema Person
    Name: String describe 'full name';
    Age: Integer[0..130];
  end;
begin
end.",
    );
    assert!(result.ok(), "errors: {:?}", result.errors);

    let schema = result.schemas.get("Person").expect("Person in schema table");
    assert_eq!(schema.fields.len(), 2);
    assert_eq!(schema.fields[0].description.as_deref(), Some("full name"));
    assert_eq!(schema.fields[1].min, Some(0));
    assert_eq!(schema.fields[1].max, Some(130));

    let json = liminal_typeck::schema_json::schema_to_json(schema);
    assert!(json.starts_with(r#"{"type":"object","properties":{"#));
    assert!(json.contains(r#""Name":{"type":"string","description":"full name"}"#));
    assert!(json.contains(r#""Age":{"type":"integer","minimum":0,"maximum":130}"#));
    assert!(json.ends_with(r#""required":["Name","Age"]}"#));
}

#[test]
fn checking_is_deterministic() {
    let source = "program D; var X: Integer; begin X := 'a'; WriteLn(Y); end.";
    let parse = liminal_parser::parse(source);
    let a = check(&parse);
    let b = check(&parse);
    assert_eq!(a.errors, b.errors);
}
