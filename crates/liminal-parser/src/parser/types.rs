//! Type grammar: primitive and named references, `?`/`!` prefixes, arrays,
//! tuples vs enums, records, schemas, and range/pattern constraints.

use crate::syntax_kind::SyntaxKind;

use super::{items, Parser};

/// Token kinds that can serve as a type name: identifiers plus the
/// primitive type keywords.
const TYPE_NAME_KINDS: &[SyntaxKind] = &[
    SyntaxKind::IDENT,
    SyntaxKind::INTEGER_KW,
    SyntaxKind::REAL_KW,
    SyntaxKind::BOOLEAN_KW,
    SyntaxKind::CHAR_KW,
    SyntaxKind::STRING_KW,
    SyntaxKind::BYTE_KW,
    SyntaxKind::BYTES_KW,
];

/// Parse a type expression.
pub(crate) fn parse_type(p: &mut Parser) {
    match p.current() {
        // `?T` -- optional
        SyntaxKind::QUESTION => {
            let m = p.open();
            p.advance();
            parse_type(p);
            p.close(m, SyntaxKind::OPTIONAL_TYPE);
        }
        // `!T` -- result with default error side
        SyntaxKind::BANG => {
            let m = p.open();
            p.advance();
            parse_type(p);
            p.close(m, SyntaxKind::RESULT_TYPE);
        }
        // `array [lo..hi] of T`
        SyntaxKind::ARRAY_KW => {
            let m = p.open();
            p.advance();
            if p.eat(SyntaxKind::L_BRACKET) {
                if p.at(SyntaxKind::INT_LITERAL) {
                    p.advance();
                    if p.eat(SyntaxKind::DOT_DOT) {
                        p.expect(SyntaxKind::INT_LITERAL, "Expected max length");
                    }
                }
                p.expect(SyntaxKind::R_BRACKET, "Expected ] in array length");
            }
            p.expect(SyntaxKind::OF_KW, "Expected of in array type");
            parse_type(p);
            p.close(m, SyntaxKind::ARRAY_TYPE);
        }
        // `record Field: Type; ... end`
        SyntaxKind::RECORD_KW => {
            let m = p.open();
            p.advance();
            while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
                parse_field_decl(p, false);
            }
            p.expect(SyntaxKind::END_KW, "Expected end after record fields");
            p.close(m, SyntaxKind::RECORD_TYPE);
        }
        // `(A, B, C)` -- an enum when every element is a plain name,
        // otherwise a tuple type.
        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance();
            let mut all_names = true;
            loop {
                if p.at_any(TYPE_NAME_KINDS) {
                    parse_type_ref(p);
                } else {
                    all_names = false;
                    parse_type(p);
                }
                if !p.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            p.expect(SyntaxKind::R_PAREN, "Expected ) in tuple type");
            let kind = if all_names {
                SyntaxKind::ENUM_TYPE
            } else {
                SyntaxKind::TUPLE_TYPE
            };
            p.close(m, kind);
        }
        k if TYPE_NAME_KINDS.contains(&k) => {
            let base = parse_type_ref(p);
            // `Base[min..max]` range/length constraint.
            if p.at(SyntaxKind::L_BRACKET) {
                let m = p.open_before(base);
                p.advance();
                if p.at(SyntaxKind::INT_LITERAL) {
                    p.advance();
                    if p.eat(SyntaxKind::DOT_DOT) {
                        p.expect(SyntaxKind::INT_LITERAL, "Expected max bound");
                    }
                }
                p.expect(SyntaxKind::R_BRACKET, "Expected ] after constraint");
                p.close(m, SyntaxKind::CONSTRAINED_TYPE);
            } else if p.at_contextual("matching") {
                // `String matching '<regex>'`
                let m = p.open_before(base);
                p.advance(); // matching
                if p.at(SyntaxKind::STRING_LITERAL) || p.at(SyntaxKind::CHAR_LITERAL) {
                    p.advance();
                } else {
                    p.error("Expected pattern string");
                }
                p.close(m, SyntaxKind::CONSTRAINED_TYPE);
            }
        }
        _ => {
            p.error("Unexpected token in type");
            if !p.at(SyntaxKind::EOF) {
                p.advance();
            }
        }
    }
}

/// A bare type name (identifier or primitive keyword) as a TYPE_REF node.
fn parse_type_ref(p: &mut Parser) -> super::MarkClosed {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::TYPE_REF)
}

/// `schema` body: field declarations with optional `describe` annotations,
/// terminated by `end;`. The `schema Name` header is consumed by the caller.
pub(crate) fn parse_schema_type(p: &mut Parser) {
    let m = p.open();
    while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        parse_field_decl(p, true);
    }
    p.expect(SyntaxKind::END_KW, "Expected end after schema fields");
    p.expect(SyntaxKind::SEMICOLON, "Expected ; after schema");
    p.close(m, SyntaxKind::SCHEMA_TYPE);
}

/// One field declaration: `Name: Type [describe 'text'];`
///
/// `describe` is only meaningful on schema fields; record fields reject it
/// by not looking for it.
fn parse_field_decl(p: &mut Parser, allow_describe: bool) {
    let m = p.open();
    items::parse_name(p);
    p.expect(SyntaxKind::COLON, "Expected : in field declaration");
    parse_type(p);
    if allow_describe && p.at_contextual("describe") {
        p.advance(); // describe
        if p.at(SyntaxKind::STRING_LITERAL) || p.at(SyntaxKind::CHAR_LITERAL) {
            p.advance();
        } else {
            p.error("Expected description string");
        }
    }
    p.expect(SyntaxKind::SEMICOLON, "Expected ; after field");
    p.close(m, SyntaxKind::FIELD_DECL);
}
