//! Pratt expression parser for Liminal.
//!
//! Implements operator precedence parsing using binding power tables.
//! Handles all Liminal expression forms: literals, identifiers, unary and
//! binary operators, calls, indexing, field access, tuple/array/record
//! literals, f-strings, and the oracle forms `ask`, `consult`, and `embed`.

use crate::syntax_kind::SyntaxKind;

use super::{MarkClosed, Parser};

// ── Binding Power Tables ───────────────────────────────────────────────

/// Returns (left_bp, right_bp) for infix operators.
///
/// Left < right means left-associative (the usual case). Precedence classes
/// from lowest to highest: `or`, `and`, comparison, additive,
/// multiplicative.
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    match op {
        SyntaxKind::OR_KW => Some((1, 2)),
        SyntaxKind::AND_KW => Some((3, 4)),
        SyntaxKind::EQ
        | SyntaxKind::NEQ
        | SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LE
        | SyntaxKind::GE => Some((5, 6)),
        SyntaxKind::PLUS | SyntaxKind::MINUS => Some((7, 8)),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::DIV_KW | SyntaxKind::MOD_KW => {
            Some((9, 10))
        }
        _ => None,
    }
}

/// Right binding power for prefix operators (`-`, `not`).
const PREFIX_BP: u8 = 11;

/// Postfix operations (call, field access, indexing) bind tighter than all
/// prefix and infix operators.
const POSTFIX_BP: u8 = 13;

// ── Expression Entry Point ─────────────────────────────────────────────

/// Parse an expression at the default (lowest) binding power.
pub(crate) fn expr(p: &mut Parser) {
    expr_bp(p, 0);
}

/// Parse an expression with the given minimum binding power.
///
/// This is the core Pratt loop: parse an atom or prefix expression as the
/// LHS, then keep consuming postfix and infix operators while their binding
/// power exceeds `min_bp`.
fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = lhs(p)?;

    loop {
        let current = p.current();

        // ── Postfix: field access ──
        if current == SyntaxKind::DOT && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            p.advance(); // .
            if !p.eat(SyntaxKind::IDENT) {
                p.error("Expected field name after .");
            }
            lhs = p.close(m, SyntaxKind::FIELD_ACCESS);
            continue;
        }

        // ── Postfix: call ──
        if current == SyntaxKind::L_PAREN && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            parse_arg_list(p);
            lhs = p.close(m, SyntaxKind::CALL_EXPR);
            continue;
        }

        // ── Postfix: indexing ──
        if current == SyntaxKind::L_BRACKET && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            p.advance(); // [
            expr_bp(p, 0);
            while p.eat(SyntaxKind::COMMA) {
                expr_bp(p, 0);
            }
            p.expect(SyntaxKind::R_BRACKET, "Expected ] after index");
            lhs = p.close(m, SyntaxKind::INDEX_EXPR);
            continue;
        }

        // ── Infix operators ──
        if let Some((left_bp, right_bp)) = infix_binding_power(current) {
            if left_bp < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // operator
            expr_bp(p, right_bp);
            lhs = p.close(m, SyntaxKind::BINARY_EXPR);
            continue;
        }

        break;
    }

    Some(lhs)
}

/// Parse the left-hand side: a prefix expression or an atom.
fn lhs(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        SyntaxKind::MINUS | SyntaxKind::NOT_KW => {
            let m = p.open();
            p.advance();
            expr_bp(p, PREFIX_BP);
            Some(p.close(m, SyntaxKind::UNARY_EXPR))
        }
        _ => atom(p),
    }
}

/// Parse an atomic expression.
fn atom(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        // ── Literals ──
        SyntaxKind::INT_LITERAL
        | SyntaxKind::REAL_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::CHAR_LITERAL
        | SyntaxKind::BYTES_LITERAL
        | SyntaxKind::DURATION_LITERAL
        | SyntaxKind::MONEY_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::LITERAL))
        }

        // ── Identifier ──
        SyntaxKind::IDENT => Some(parse_name_ref(p)),

        // ── Oracle forms ──
        SyntaxKind::ASK_KW => Some(parse_ask(p)),
        SyntaxKind::CONSULT_KW => Some(parse_consult(p)),
        SyntaxKind::EMBED_KW => Some(parse_embed(p)),

        // ── F-string ──
        SyntaxKind::FSTRING_START => Some(parse_string_expr(p)),

        // ── Parenthesized expression or tuple literal ──
        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance(); // (
            expr_bp(p, 0);
            let mut is_tuple = false;
            while p.eat(SyntaxKind::COMMA) {
                is_tuple = true;
                expr_bp(p, 0);
            }
            p.expect(SyntaxKind::R_PAREN, "Expected )");
            let kind = if is_tuple {
                SyntaxKind::TUPLE_EXPR
            } else {
                SyntaxKind::PAREN_EXPR
            };
            Some(p.close(m, kind))
        }

        // ── Array literal ──
        SyntaxKind::L_BRACKET => {
            let m = p.open();
            p.advance(); // [
            if !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
                expr_bp(p, 0);
                while p.eat(SyntaxKind::COMMA) {
                    expr_bp(p, 0);
                }
            }
            p.expect(SyntaxKind::R_BRACKET, "Expected ] after array literal");
            Some(p.close(m, SyntaxKind::ARRAY_EXPR))
        }

        // ── Record literal ──
        SyntaxKind::L_BRACE => {
            let m = p.open();
            p.advance(); // {
            if !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
                loop {
                    let f = p.open();
                    super::items::parse_name(p);
                    p.expect(SyntaxKind::COLON, "Expected : in record field");
                    expr_bp(p, 0);
                    p.close(f, SyntaxKind::RECORD_FIELD);
                    if !p.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
            }
            p.expect(SyntaxKind::R_BRACE, "Expected } after record literal");
            Some(p.close(m, SyntaxKind::RECORD_EXPR))
        }

        _ => {
            if p.at(SyntaxKind::EOF) {
                p.error("Unexpected end of input in expression");
            } else {
                p.advance_with_error("Unexpected token in expression");
            }
            None
        }
    }
}

/// Parse an identifier as a NAME_REF node.
fn parse_name_ref(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::NAME_REF)
}

/// `(arg, arg, ...)` argument list of a call.
fn parse_arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    if !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        expr_bp(p, 0);
        while p.eat(SyntaxKind::COMMA) {
            expr_bp(p, 0);
        }
    }
    p.expect(SyntaxKind::R_PAREN, "Expected ) after arguments");
    p.close(m, SyntaxKind::ARG_LIST);
}

// ── Oracle forms ───────────────────────────────────────────────────────

/// `ask Oracle <- expr [into Type] [else expr] [with cost]`
fn parse_ask(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // ask
    if p.at(SyntaxKind::IDENT) {
        parse_name_ref(p);
    } else {
        p.error("Expected oracle after ask");
    }
    if p.eat(SyntaxKind::LT) {
        p.eat(SyntaxKind::MINUS);
    } else {
        p.error("Expected <- after ask oracle");
    }
    expr_bp(p, 0);
    if p.at(SyntaxKind::INTO_KW) {
        parse_into_clause(p);
    }
    if p.at(SyntaxKind::ELSE_KW) {
        parse_else_clause(p);
    }
    if p.at(SyntaxKind::WITH_KW) {
        let c = p.open();
        p.advance(); // with
        if p.at_contextual("cost") {
            p.advance();
        }
        p.close(c, SyntaxKind::COST_CLAUSE);
    }
    p.close(m, SyntaxKind::ASK_EXPR)
}

/// `consult Oracle from expr [into Type] [with attempts: N]
///  [on failure (F) <actions> end] [else expr]`
///
/// Recognized actions are `retry with hint expr` and `yield expr`; anything
/// else in the failure block is consumed and ignored.
fn parse_consult(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // consult
    if p.at(SyntaxKind::IDENT) {
        parse_name_ref(p);
    } else {
        p.error("Expected oracle after consult");
    }
    p.expect(SyntaxKind::FROM_KW, "Expected from after consult oracle");
    expr_bp(p, 0);
    if p.at(SyntaxKind::INTO_KW) {
        parse_into_clause(p);
    }
    if p.at(SyntaxKind::WITH_KW) {
        let c = p.open();
        p.advance(); // with
        if p.at_contextual("attempts") {
            p.advance();
            p.expect(SyntaxKind::COLON, "Expected : after attempts");
            p.expect(SyntaxKind::INT_LITERAL, "Expected attempts integer");
        }
        p.close(c, SyntaxKind::ATTEMPTS_CLAUSE);
    }
    if p.at(SyntaxKind::ON_KW) {
        parse_on_failure(p);
    }
    if p.at(SyntaxKind::ELSE_KW) {
        parse_else_clause(p);
    }
    p.close(m, SyntaxKind::CONSULT_EXPR)
}

/// `on failure (F) <actions> end`
fn parse_on_failure(p: &mut Parser) {
    let m = p.open();
    p.advance(); // on
    if p.at_contextual("failure") {
        p.advance();
    } else {
        p.error("Expected failure after on");
    }
    // Optional failure binding `(F: TOracleFailure)` -- consumed, unused.
    if p.eat(SyntaxKind::L_PAREN) {
        while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
            p.advance();
        }
        p.eat(SyntaxKind::R_PAREN);
    }
    while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        if p.at_contextual("retry") {
            let c = p.open();
            p.advance(); // retry
            if p.eat(SyntaxKind::WITH_KW) && p.at_contextual("hint") {
                p.advance(); // hint
                expr_bp(p, 0);
            }
            p.close(c, SyntaxKind::RETRY_CLAUSE);
        } else if p.at_contextual("yield") {
            let c = p.open();
            p.advance(); // yield
            expr_bp(p, 0);
            p.close(c, SyntaxKind::YIELD_CLAUSE);
        } else {
            // Unrecognized failure action: consume and move on.
            p.advance();
        }
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.expect(SyntaxKind::END_KW, "Expected end after failure actions");
    p.close(m, SyntaxKind::ON_FAILURE_CLAUSE);
}

/// `embed Oracle <- expr`
fn parse_embed(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // embed
    if p.at(SyntaxKind::IDENT) {
        parse_name_ref(p);
    } else {
        p.error("Expected oracle after embed");
    }
    if p.eat(SyntaxKind::LT) {
        p.eat(SyntaxKind::MINUS);
    } else {
        p.error("Expected <- after embed oracle");
    }
    expr_bp(p, 0);
    p.close(m, SyntaxKind::EMBED_EXPR)
}

fn parse_into_clause(p: &mut Parser) {
    let m = p.open();
    p.advance(); // into
    super::types::parse_type(p);
    p.close(m, SyntaxKind::INTO_CLAUSE);
}

fn parse_else_clause(p: &mut Parser) {
    let m = p.open();
    p.advance(); // else
    expr_bp(p, 0);
    p.close(m, SyntaxKind::ELSE_CLAUSE);
}

// ── F-strings ──────────────────────────────────────────────────────────

/// An interpolated string: literal content runs and `{expr}` segments
/// between the f-string start and end markers.
fn parse_string_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // f'
    loop {
        match p.current() {
            SyntaxKind::STRING_CONTENT => p.advance(),
            SyntaxKind::INTERPOLATION_START => {
                let seg = p.open();
                p.advance(); // {
                expr_bp(p, 0);
                p.expect(SyntaxKind::INTERPOLATION_END, "Expected } after interpolation");
                p.close(seg, SyntaxKind::INTERPOLATION);
            }
            SyntaxKind::FSTRING_END => {
                p.advance();
                break;
            }
            _ => {
                p.error("Unterminated f-string");
                break;
            }
        }
    }
    p.close(m, SyntaxKind::STRING_EXPR)
}
