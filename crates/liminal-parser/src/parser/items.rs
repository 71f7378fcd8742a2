//! Section and declaration parsing: uses, config, types, oracles, var,
//! and function declarations.

use crate::syntax_kind::SyntaxKind;

use super::{statements, types, Parser};

/// Parse a definition-position name: a single identifier wrapped in NAME.
pub(crate) fn parse_name(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IDENT, "Expected a name");
    p.close(m, SyntaxKind::NAME);
}

/// `uses Foo, Bar;` -- the clause is recorded but has no semantics yet.
pub(crate) fn parse_use_clause(p: &mut Parser) {
    let m = p.open();
    p.advance(); // uses
    while !p.at(SyntaxKind::SEMICOLON) && !p.at(SyntaxKind::EOF) {
        p.advance();
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::USE_CLAUSE);
}

/// `config` section: `key = value;` items until the `types` keyword (or any
/// other section keyword).
pub(crate) fn parse_config_section(p: &mut Parser) {
    p.advance(); // config
    while p.at(SyntaxKind::IDENT) {
        let m = p.open();
        parse_name(p);
        p.expect(SyntaxKind::EQ, "Expected = in config item");
        super::expressions::expr(p);
        p.expect(SyntaxKind::SEMICOLON, "Expected ; after config item");
        p.close(m, SyntaxKind::CONFIG_ITEM);
    }
}

const TYPES_SECTION_END: &[SyntaxKind] = &[
    SyntaxKind::ORACLES_KW,
    SyntaxKind::VAR_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::BEGIN_KW,
    SyntaxKind::EOF,
];

/// `types` section: named type and schema declarations.
pub(crate) fn parse_types_section(p: &mut Parser) {
    p.advance(); // types
    while !p.at_any(TYPES_SECTION_END) {
        parse_type_decl(p);
    }
}

/// One declaration in the `types` section:
/// - `schema Name Field: Type [describe '...']; ... end;`
/// - `Name = Type;`
fn parse_type_decl(p: &mut Parser) {
    let m = p.open();
    if p.at(SyntaxKind::SCHEMA_KW) {
        p.advance(); // schema
        parse_name(p);
        types::parse_schema_type(p);
    } else {
        parse_name(p);
        p.expect(SyntaxKind::EQ, "Expected = in type declaration");
        types::parse_type(p);
        p.expect(SyntaxKind::SEMICOLON, "Expected ; after type declaration");
    }
    p.close(m, SyntaxKind::TYPE_DECL);
}

const ORACLES_SECTION_END: &[SyntaxKind] = &[
    SyntaxKind::VAR_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::BEGIN_KW,
    SyntaxKind::EOF,
];

/// `oracles` section: `Name : Type = 'provider';` declarations.
pub(crate) fn parse_oracles_section(p: &mut Parser) {
    p.advance(); // oracles
    while !p.at_any(ORACLES_SECTION_END) {
        parse_oracle_decl(p);
    }
}

fn parse_oracle_decl(p: &mut Parser) {
    let m = p.open();
    parse_name(p);
    p.expect(SyntaxKind::COLON, "Expected : in oracle declaration");
    types::parse_type(p);
    p.expect(SyntaxKind::EQ, "Expected = in oracle declaration");
    if p.at(SyntaxKind::STRING_LITERAL) || p.at(SyntaxKind::CHAR_LITERAL) {
        p.advance();
    } else {
        p.error("Expected provider string");
        if !p.at(SyntaxKind::EOF) {
            p.advance();
        }
    }
    // Any trailing provider qualifiers are consumed up to the semicolon.
    while !p.at(SyntaxKind::SEMICOLON) && !p.at(SyntaxKind::EOF) {
        p.advance();
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::ORACLE_DECL);
}

const VAR_SECTION_END: &[SyntaxKind] = &[
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::BEGIN_KW,
    SyntaxKind::EOF,
];

/// Top-level `var` section.
pub(crate) fn parse_var_section(p: &mut Parser) {
    p.advance(); // var
    while !p.at_any(VAR_SECTION_END) {
        parse_var_decl(p);
    }
}

/// One variable declaration group: `a, b: Type [:= init];`
///
/// Comma-separated names share the declared type; an initializer applies to
/// the whole group (realistically, to a single-name group).
pub(crate) fn parse_var_decl(p: &mut Parser) {
    let m = p.open();
    parse_name(p);
    while p.eat(SyntaxKind::COMMA) {
        parse_name(p);
    }
    p.expect(SyntaxKind::COLON, "Expected : in variable declaration");
    types::parse_type(p);
    if p.eat(SyntaxKind::ASSIGN) {
        super::expressions::expr(p);
    }
    p.expect(SyntaxKind::SEMICOLON, "Expected ; after variable declaration");
    p.close(m, SyntaxKind::VAR_DECL);
}

/// Function declaration:
/// `function Name(a, b: T; c: U): R; [var ...] begin ... end;`
pub(crate) fn parse_function(p: &mut Parser) {
    let m = p.open();
    p.advance(); // function
    parse_name(p);
    parse_param_list(p);
    p.expect(SyntaxKind::COLON, "Expected : before result type");
    types::parse_type(p);
    p.expect(SyntaxKind::SEMICOLON, "Expected ; after function signature");

    if p.at(SyntaxKind::VAR_KW) {
        let vb = p.open();
        p.advance(); // var
        while !p.at(SyntaxKind::BEGIN_KW) && !p.at(SyntaxKind::EOF) {
            parse_var_decl(p);
        }
        p.close(vb, SyntaxKind::VAR_BLOCK);
    }

    statements::parse_block(p);
    p.expect(SyntaxKind::SEMICOLON, "Expected ; after function body");
    p.close(m, SyntaxKind::FUNC_DECL);
}

/// `(a, b: Integer; c: String)` -- groups separated by semicolons, names in
/// a group sharing one type. An empty list is just `()`.
fn parse_param_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN, "Expected ( after function name");
    if !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        loop {
            let pm = p.open();
            parse_name(p);
            while p.eat(SyntaxKind::COMMA) {
                parse_name(p);
            }
            p.expect(SyntaxKind::COLON, "Expected : in parameter");
            types::parse_type(p);
            p.close(pm, SyntaxKind::PARAM);
            if !p.eat(SyntaxKind::SEMICOLON) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_PAREN, "Expected ) after parameters");
    p.close(m, SyntaxKind::PARAM_LIST);
}
