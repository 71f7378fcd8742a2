//! Statement parsing: assignment, control flow, blocks, and the oracle-free
//! statement forms.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, items, Parser};

/// `begin S; S; ... end` block.
pub(crate) fn parse_block(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::BEGIN_KW, "Expected begin");
    while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        parse_statement(p);
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.expect(SyntaxKind::END_KW, "Expected end");
    p.close(m, SyntaxKind::BLOCK);
}

/// Parse one statement, dispatching on the leading token.
pub(crate) fn parse_statement(p: &mut Parser) {
    match p.current() {
        SyntaxKind::IF_KW => parse_if(p),
        SyntaxKind::WHILE_KW => parse_while(p),
        SyntaxKind::REPEAT_KW => parse_repeat(p),
        SyntaxKind::FOR_KW => parse_for(p),
        SyntaxKind::CASE_KW => parse_case(p),
        SyntaxKind::LOOP_KW => parse_loop(p),
        SyntaxKind::PARALLEL_KW => parse_parallel(p),
        SyntaxKind::TRY_KW => parse_try(p),
        SyntaxKind::BREAK_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::BREAK_STMT);
        }
        SyntaxKind::CONTINUE_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::CONTINUE_STMT);
        }
        SyntaxKind::RETURN_KW => parse_return(p),
        SyntaxKind::BEGIN_KW => parse_block(p),
        _ => parse_assignment_or_expr(p),
    }
}

/// `if cond then S [else S]`
fn parse_if(p: &mut Parser) {
    let m = p.open();
    p.advance(); // if
    expressions::expr(p);
    p.expect(SyntaxKind::THEN_KW, "Expected then");
    parse_statement(p);
    if p.eat(SyntaxKind::ELSE_KW) {
        parse_statement(p);
    }
    p.close(m, SyntaxKind::IF_STMT);
}

/// `while cond do S`
fn parse_while(p: &mut Parser) {
    let m = p.open();
    p.advance(); // while
    expressions::expr(p);
    p.expect(SyntaxKind::DO_KW, "Expected do");
    parse_statement(p);
    p.close(m, SyntaxKind::WHILE_STMT);
}

/// `repeat S; S; ... until cond`
fn parse_repeat(p: &mut Parser) {
    let m = p.open();
    p.advance(); // repeat
    while !p.at(SyntaxKind::UNTIL_KW) && !p.at(SyntaxKind::EOF) {
        parse_statement(p);
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.expect(SyntaxKind::UNTIL_KW, "Expected until");
    expressions::expr(p);
    p.close(m, SyntaxKind::REPEAT_STMT);
}

/// `for V := lo to|downto hi do S` or `for V in A do S`
fn parse_for(p: &mut Parser) {
    let m = p.open();
    p.advance(); // for
    items::parse_name(p);
    if p.eat(SyntaxKind::IN_KW) {
        expressions::expr(p);
        p.expect(SyntaxKind::DO_KW, "Expected do");
        parse_statement(p);
        p.close(m, SyntaxKind::FOR_IN_STMT);
        return;
    }
    p.expect(SyntaxKind::ASSIGN, "Expected := in for loop");
    expressions::expr(p);
    if !p.eat(SyntaxKind::TO_KW) && !p.eat(SyntaxKind::DOWNTO_KW) {
        p.error("Expected to or downto");
        if !p.at(SyntaxKind::EOF) {
            p.advance();
        }
    }
    expressions::expr(p);
    p.expect(SyntaxKind::DO_KW, "Expected do");
    parse_statement(p);
    p.close(m, SyntaxKind::FOR_STMT);
}

/// `case E of pat: S; ... [else: S] end`
fn parse_case(p: &mut Parser) {
    let m = p.open();
    p.advance(); // case
    expressions::expr(p);
    p.expect(SyntaxKind::OF_KW, "Expected of");
    while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        if p.at(SyntaxKind::ELSE_KW) {
            let a = p.open();
            p.advance(); // else
            p.eat(SyntaxKind::COLON);
            parse_statement(p);
            p.eat(SyntaxKind::SEMICOLON);
            p.close(a, SyntaxKind::CASE_ELSE);
            break;
        }
        let a = p.open();
        expressions::expr(p);
        p.expect(SyntaxKind::COLON, "Expected : after case pattern");
        parse_statement(p);
        p.eat(SyntaxKind::SEMICOLON);
        p.close(a, SyntaxKind::CASE_ARM);
    }
    p.expect(SyntaxKind::END_KW, "Expected end after case");
    p.close(m, SyntaxKind::CASE_STMT);
}

/// `loop S; S; ... end`
fn parse_loop(p: &mut Parser) {
    let m = p.open();
    p.advance(); // loop
    while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        parse_statement(p);
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.expect(SyntaxKind::END_KW, "Expected end after loop");
    p.close(m, SyntaxKind::LOOP_STMT);
}

/// `parallel S; S; ... end` -- parsed for forward compatibility; the body
/// executes sequentially.
fn parse_parallel(p: &mut Parser) {
    let m = p.open();
    p.advance(); // parallel
    while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        parse_statement(p);
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.expect(SyntaxKind::END_KW, "Expected end after parallel");
    p.close(m, SyntaxKind::PARALLEL_STMT);
}

/// `try S; ... except S; ... end`
fn parse_try(p: &mut Parser) {
    let m = p.open();
    p.advance(); // try
    while !p.at(SyntaxKind::EXCEPT_KW) && !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
        parse_statement(p);
        p.eat(SyntaxKind::SEMICOLON);
    }
    if p.at(SyntaxKind::EXCEPT_KW) {
        let c = p.open();
        p.advance(); // except
        while !p.at(SyntaxKind::END_KW) && !p.at(SyntaxKind::EOF) {
            parse_statement(p);
            p.eat(SyntaxKind::SEMICOLON);
        }
        p.close(c, SyntaxKind::EXCEPT_CLAUSE);
    }
    p.expect(SyntaxKind::END_KW, "Expected end after try");
    p.close(m, SyntaxKind::TRY_STMT);
}

/// `return [expr]`
fn parse_return(p: &mut Parser) {
    let m = p.open();
    p.advance(); // return
    if !p.at_any(&[
        SyntaxKind::SEMICOLON,
        SyntaxKind::END_KW,
        SyntaxKind::UNTIL_KW,
        SyntaxKind::ELSE_KW,
        SyntaxKind::EOF,
    ]) {
        expressions::expr(p);
    }
    p.close(m, SyntaxKind::RETURN_STMT);
}

/// `target := value` or a bare expression statement.
fn parse_assignment_or_expr(p: &mut Parser) {
    let m = p.open();
    expressions::expr(p);
    if p.eat(SyntaxKind::ASSIGN) {
        expressions::expr(p);
        p.close(m, SyntaxKind::ASSIGN_STMT);
    } else {
        p.close(m, SyntaxKind::EXPR_STMT);
    }
}
