// Liminal lexer -- tokenizer for the Liminal programming language.

mod cursor;

use cursor::Cursor;
use liminal_common::token::{keyword_from_str, Token, TokenKind};

/// Tracks what the lexer is currently doing.
#[derive(Debug, Clone, PartialEq)]
enum LexerState {
    /// Normal top-level tokenization.
    Normal,
    /// Inside an f-string literal (after FStringStart emitted).
    InFString,
    /// Inside a `{...}` f-string interpolation.
    InInterpolation { brace_depth: u32 },
}

/// The Liminal lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or collect
/// them into a `Vec`. Whitespace and comments are emitted as trivia tokens
/// so the parser can build a lossless tree; erroneous input yields `Error`
/// tokens carrying a message, and lexing always continues past them.
///
/// Uses a state stack to handle f-string interpolation contexts.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src str,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Pending tokens to emit before resuming normal lexing.
    pending: Vec<Token>,
    /// State stack for tracking nested lexing contexts.
    state_stack: Vec<LexerState>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            emitted_eof: false,
            pending: Vec::new(),
            state_stack: vec![LexerState::Normal],
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes trivia tokens and the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// The text of a token, sliced from the original source.
    pub fn text(&self, token: &Token) -> &'src str {
        self.cursor.slice(token.span.start, token.span.end)
    }

    /// Current lexer state (top of stack).
    fn current_state(&self) -> &LexerState {
        self.state_stack.last().expect("state stack must never be empty")
    }

    /// Produce the next token based on current state.
    fn produce_token(&mut self) -> Token {
        match self.current_state().clone() {
            LexerState::Normal | LexerState::InInterpolation { .. } => self.lex_normal(),
            LexerState::InFString => self.lex_fstring_content(),
        }
    }

    // ── Normal mode ────────────────────────────────────────────────────

    /// Tokenize in normal mode (top level or inside an interpolation).
    fn lex_normal(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Trivia ──────────────────────────────────────────────────
            ' ' | '\t' | '\r' | '\n' => {
                self.cursor.eat_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                Token::new(TokenKind::Whitespace, start, self.cursor.pos())
            }
            '/' if self.cursor.peek_next() == Some('/') => self.lex_line_comment(start),
            '/' if self.cursor.peek_next() == Some('*') => self.lex_block_comment(start),

            // ── Money literals ──────────────────────────────────────────
            '$' => self.lex_money(start),

            // ── Prefixed string literals ────────────────────────────────
            'b' | 'B' if self.cursor.peek_next() == Some('\'') => {
                self.cursor.advance(); // prefix
                self.lex_string(start, TokenKind::BytesLiteral)
            }
            'f' | 'F' if self.cursor.peek_next() == Some('\'') => self.lex_fstring_start(start),

            // ── Identifiers and keywords ────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            // ── Number literals ─────────────────────────────────────────
            '0'..='9' => self.lex_number(start),

            // ── String literals ─────────────────────────────────────────
            '\'' => self.lex_string(start, TokenKind::StringLiteral),

            // ── Multi-character operators ───────────────────────────────
            ':' => self.lex_colon(start),
            '.' => self.lex_dot(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),

            // ── Single-character tokens ─────────────────────────────────
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.single_char_token(TokenKind::Slash, start),
            '=' => self.single_char_token(TokenKind::Eq, start),
            '?' => self.single_char_token(TokenKind::Question, start),
            '!' => self.single_char_token(TokenKind::Bang, start),
            '{' => self.lex_lbrace(start),
            '}' => self.lex_rbrace(start),

            // ── Unknown character (error recovery) ──────────────────────
            _ => {
                self.cursor.advance();
                Token::error(start, self.cursor.pos(), "Unexpected character")
            }
        }
    }

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `{` -- a record-literal open brace, or a nested brace inside an
    /// f-string interpolation (where depth must be tracked so the matching
    /// `}` is not taken as the interpolation end).
    fn lex_lbrace(&mut self, start: u32) -> Token {
        if let Some(LexerState::InInterpolation { brace_depth }) = self.state_stack.last_mut() {
            *brace_depth += 1;
        }
        self.single_char_token(TokenKind::LBrace, start)
    }

    /// `}` -- closes a record literal, a nested brace, or the current
    /// f-string interpolation.
    fn lex_rbrace(&mut self, start: u32) -> Token {
        if let Some(LexerState::InInterpolation { brace_depth }) = self.state_stack.last_mut() {
            if *brace_depth == 0 {
                self.state_stack.pop();
                self.cursor.advance();
                return Token::new(TokenKind::InterpolationEnd, start, self.cursor.pos());
            }
            *brace_depth -= 1;
        }
        self.single_char_token(TokenKind::RBrace, start)
    }

    // ── Operator lexing ────────────────────────────────────────────────

    /// `:` -> `Colon`, `:=` -> `Assign`
    fn lex_colon(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::Assign, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Colon, start, self.cursor.pos())
        }
    }

    /// `.` -> `Dot`, `..` -> `DotDot`
    fn lex_dot(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            Token::new(TokenKind::DotDot, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Dot, start, self.cursor.pos())
        }
    }

    /// `<` -> `Lt`, `<=` -> `Le`, `<>` -> `Neq`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => {
                self.cursor.advance();
                Token::new(TokenKind::Le, start, self.cursor.pos())
            }
            Some('>') => {
                self.cursor.advance();
                Token::new(TokenKind::Neq, start, self.cursor.pos())
            }
            _ => Token::new(TokenKind::Lt, start, self.cursor.pos()),
        }
    }

    /// `>` -> `Gt`, `>=` -> `Ge`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::Ge, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Gt, start, self.cursor.pos())
        }
    }

    // ── Comments ───────────────────────────────────────────────────────

    /// Line comment: `// ...` up to (not including) the newline.
    fn lex_line_comment(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.advance();
        self.cursor.eat_while(|c| c != '\n');
        Token::new(TokenKind::Comment, start, self.cursor.pos())
    }

    /// Block comment: `/* ... */`. Block comments do not nest.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            match self.cursor.advance() {
                None => {
                    return Token::error(start, self.cursor.pos(), "Unterminated block comment");
                }
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::Comment, start, self.cursor.pos());
                }
                Some(_) => {}
            }
        }
    }

    // ── Identifiers ────────────────────────────────────────────────────

    /// Identifier or (case-insensitive) keyword.
    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_part);
        let text = self.cursor.slice(start, self.cursor.pos());
        match keyword_from_str(text) {
            Some(kind) => Token::new(kind, start, self.cursor.pos()),
            None => Token::new(TokenKind::Ident, start, self.cursor.pos()),
        }
    }

    // ── Number literals ────────────────────────────────────────────────

    /// Integer, real, or duration literal starting with a digit.
    ///
    /// Digits, then an optional `.` + digits fraction. An integer may carry
    /// a duration suffix `ms`, `s`, `m`, or `h`. A `.` not followed by a
    /// digit is left for the `..` range operator.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        let mut is_real = false;
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            is_real = true;
            self.cursor.advance(); // '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        if !is_real {
            match (self.cursor.peek(), self.cursor.peek_next()) {
                (Some('m'), Some('s')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return Token::new(TokenKind::DurationLiteral, start, self.cursor.pos());
                }
                (Some('s' | 'm' | 'h'), _) => {
                    self.cursor.advance();
                    return Token::new(TokenKind::DurationLiteral, start, self.cursor.pos());
                }
                _ => {}
            }
        }

        if is_real {
            Token::new(TokenKind::RealLiteral, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::IntLiteral, start, self.cursor.pos())
        }
    }

    /// Money literal: `$` digits, optional `.` + digits.
    fn lex_money(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '$'
        if !self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Token::error(start, self.cursor.pos(), "Invalid money literal");
        }
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        Token::new(TokenKind::MoneyLiteral, start, self.cursor.pos())
    }

    // ── String literals ────────────────────────────────────────────────

    /// Quoted string (or bytes) literal. `start` points at the prefix for
    /// bytes literals, at the opening quote otherwise. Backslash escapes are
    /// kept raw in the lexeme; decoding happens during lowering. A string
    /// whose content is a single codepoint is reclassified as a char.
    fn lex_string(&mut self, start: u32, kind: TokenKind) -> Token {
        self.cursor.advance(); // opening quote
        let mut content_len: u32 = 0;
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Token::error(start, self.cursor.pos(), "Unterminated string");
                }
                Some('\'') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some_and(|c| c != '\n') {
                        self.cursor.advance();
                    }
                    content_len += 1;
                }
                Some(_) => {
                    self.cursor.advance();
                    content_len += 1;
                }
            }
        }
        let kind = if kind == TokenKind::StringLiteral && content_len == 1 {
            TokenKind::CharLiteral
        } else {
            kind
        };
        Token::new(kind, start, self.cursor.pos())
    }

    // ── F-strings ──────────────────────────────────────────────────────

    /// Opening `f'` of an f-string. Emits `FStringStart` and pushes
    /// `InFString` onto the state stack.
    fn lex_fstring_start(&mut self, start: u32) -> Token {
        self.cursor.advance(); // 'f'
        self.cursor.advance(); // '\''
        self.state_stack.push(LexerState::InFString);
        Token::new(TokenKind::FStringStart, start, self.cursor.pos())
    }

    /// Lex f-string content when in InFString state.
    ///
    /// Scans characters until finding:
    /// - `{` -> emit StringContent (if any), then InterpolationStart
    /// - closing `'` -> emit StringContent (if any), then FStringEnd
    /// - escape sequence -> included in content
    /// - EOF or newline -> Error token
    fn lex_fstring_content(&mut self) -> Token {
        let start = self.cursor.pos();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    self.state_stack.pop();
                    let end = self.cursor.pos();
                    if end > start {
                        self.pending.push(Token::error(end, end, "Unterminated string"));
                        return Token::new(TokenKind::StringContent, start, end);
                    }
                    return Token::error(start, end, "Unterminated string");
                }
                Some('{') => {
                    let content_end = self.cursor.pos();
                    self.cursor.advance();
                    let interp_end = self.cursor.pos();
                    self.state_stack.push(LexerState::InInterpolation { brace_depth: 0 });
                    let interp =
                        Token::new(TokenKind::InterpolationStart, content_end, interp_end);
                    if content_end > start {
                        self.pending.push(interp);
                        return Token::new(TokenKind::StringContent, start, content_end);
                    }
                    return interp;
                }
                Some('\'') => {
                    let content_end = self.cursor.pos();
                    self.cursor.advance();
                    let str_end = self.cursor.pos();
                    self.state_stack.pop();
                    let end_tok = Token::new(TokenKind::FStringEnd, content_end, str_end);
                    if content_end > start {
                        self.pending.push(end_tok);
                        return Token::new(TokenKind::StringContent, start, content_end);
                    }
                    return end_tok;
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some_and(|c| c != '\n') {
                        self.cursor.advance();
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if !self.pending.is_empty() {
            return Some(self.pending.remove(0));
        }
        if self.emitted_eof {
            return None;
        }
        let token = self.produce_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Significant (non-trivia) token kinds for a source string.
    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .into_iter()
            .filter(|t| !t.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("PROGRAM begin End"),
            vec![
                TokenKind::Program,
                TokenKind::Begin,
                TokenKind::End,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn assign_and_comparison_operators() {
        assert_eq!(
            kinds(":= = <> <= >= < >"),
            vec![
                TokenKind::Assign,
                TokenKind::Eq,
                TokenKind::Neq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn dot_dot_is_one_token() {
        assert_eq!(
            kinds("1..5"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::DotDot,
                TokenKind::IntLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn duration_suffixes() {
        assert_eq!(kinds("500ms")[0], TokenKind::DurationLiteral);
        assert_eq!(kinds("5s")[0], TokenKind::DurationLiteral);
        assert_eq!(kinds("3m")[0], TokenKind::DurationLiteral);
        assert_eq!(kinds("2h")[0], TokenKind::DurationLiteral);
        // A real never takes a duration suffix.
        assert_eq!(kinds("1.5")[0], TokenKind::RealLiteral);
    }

    #[test]
    fn money_literals() {
        assert_eq!(kinds("$5")[0], TokenKind::MoneyLiteral);
        assert_eq!(kinds("$12.50")[0], TokenKind::MoneyLiteral);
        let toks = Lexer::tokenize("$x");
        assert_eq!(toks[0].kind, TokenKind::Error);
        assert_eq!(toks[0].message, Some("Invalid money literal"));
    }

    #[test]
    fn single_codepoint_string_is_a_char() {
        assert_eq!(kinds("'a'")[0], TokenKind::CharLiteral);
        assert_eq!(kinds("'ab'")[0], TokenKind::StringLiteral);
        // An escaped character counts as one codepoint.
        assert_eq!(kinds("'\\n'")[0], TokenKind::CharLiteral);
    }

    #[test]
    fn bytes_literal() {
        assert_eq!(kinds("b'abc'")[0], TokenKind::BytesLiteral);
        // `b` not followed by a quote is an identifier.
        assert_eq!(kinds("b")[0], TokenKind::Ident);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let toks = Lexer::tokenize("'abc\n");
        assert_eq!(toks[0].kind, TokenKind::Error);
        assert_eq!(toks[0].message, Some("Unterminated string"));
        // Lexing continues after the error.
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn comments_are_trivia() {
        assert_eq!(
            kinds("x // comment\ny"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
        assert_eq!(
            kinds("x /* block\ncomment */ y"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn block_comments_do_not_nest() {
        // The first `*/` ends the comment; the trailing `*/` is two tokens.
        assert_eq!(
            kinds("/* a /* b */ c"),
            vec![TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn fstring_token_runs() {
        assert_eq!(
            kinds("f'sum is {A + B}!'"),
            vec![
                TokenKind::FStringStart,
                TokenKind::StringContent,
                TokenKind::InterpolationStart,
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::InterpolationEnd,
                TokenKind::StringContent,
                TokenKind::FStringEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn fstring_nested_braces() {
        // A record literal inside an interpolation keeps its own braces.
        assert_eq!(
            kinds("f'{ {a: 1} }'"),
            vec![
                TokenKind::FStringStart,
                TokenKind::InterpolationStart,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::IntLiteral,
                TokenKind::RBrace,
                TokenKind::InterpolationEnd,
                TokenKind::FStringEnd,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn error_token_advances_one_byte() {
        let toks = Lexer::tokenize("@x");
        assert_eq!(toks[0].kind, TokenKind::Error);
        assert_eq!(toks[0].span.len(), 1);
        assert_eq!(toks[1].kind, TokenKind::Ident);
    }

    #[test]
    fn every_stream_ends_in_exactly_one_eof() {
        for src in ["", "program", "'unterminated", "@#~", "f'{x"] {
            let toks = Lexer::tokenize(src);
            let eofs = toks.iter().filter(|t| t.kind == TokenKind::Eof).count();
            assert_eq!(eofs, 1, "source {src:?}");
            assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
        }
    }
}
