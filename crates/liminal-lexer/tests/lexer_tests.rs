//! Integration tests: token streams for whole programs, spans, and error
//! recovery.

use liminal_common::token::TokenKind;
use liminal_lexer::Lexer;

#[test]
fn tokenizes_a_whole_program() {
    let source = "program H;\nbegin\n  WriteLn('Hello, World!');\nend.";
    let kinds: Vec<TokenKind> = Lexer::tokenize(source)
        .into_iter()
        .filter(|t| !t.is_trivia())
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Program,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Begin,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::StringLiteral,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::End,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_cover_the_source_losslessly() {
    let source = "var X := 5s; // note\nY := $1.25";
    let tokens = Lexer::tokenize(source);
    // Tokens tile the source: each starts where the previous ended.
    let mut pos = 0u32;
    for token in &tokens {
        assert_eq!(token.span.start, pos, "gap before {:?}", token.kind);
        pos = token.span.end;
    }
    assert_eq!(pos as usize, source.len());
}

#[test]
fn lexemes_slice_from_the_source() {
    let source = "Total := Total + 1";
    let tokens = Lexer::tokenize(source);
    let texts: Vec<&str> = tokens
        .iter()
        .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
        .map(|t| &source[t.span.start as usize..t.span.end as usize])
        .collect();
    assert_eq!(texts, vec!["Total", ":=", "Total", "+", "1"]);
}

#[test]
fn oracle_forms_tokenize() {
    let source = "R := ask O <- 'hi' into Person else 'fb' with cost";
    let kinds: Vec<TokenKind> = Lexer::tokenize(source)
        .into_iter()
        .filter(|t| !t.is_trivia())
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Ask,
            TokenKind::Ident,
            TokenKind::Lt,
            TokenKind::Minus,
            TokenKind::StringLiteral,
            TokenKind::Into,
            TokenKind::Ident,
            TokenKind::Else,
            TokenKind::StringLiteral,
            TokenKind::With,
            TokenKind::Ident, // `cost` is contextual, not reserved
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexing_terminates_on_arbitrary_bytes() {
    // Any input must terminate with exactly one Eof.
    for source in [
        "",
        "\\\\\\",
        "'''''",
        "f'f'f'",
        "$$$$",
        "1..2..3",
        "/*/*/*",
        "\u{00e9}\u{00e9}",
    ] {
        let tokens = Lexer::tokenize(source);
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1, "source {source:?}");
    }
}
