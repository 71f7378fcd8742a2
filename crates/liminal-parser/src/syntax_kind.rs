//! SyntaxKind enum for the Liminal CST.
//!
//! This is a superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus
//! composite node kinds for CST nodes produced by the parser.

use liminal_common::token::TokenKind;

/// Every kind of syntax element in the Liminal CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. Composite node
/// kinds represent parser-produced tree nodes. The first two values are
/// sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (53) ──────────────────────────────────────────────────
    PROGRAM_KW,
    USES_KW,
    CONFIG_KW,
    TYPES_KW,
    ORACLES_KW,
    VAR_KW,
    FUNCTION_KW,
    BEGIN_KW,
    END_KW,
    RECORD_KW,
    SCHEMA_KW,
    ARRAY_KW,
    OF_KW,
    TUPLE_KW,
    INTEGER_KW,
    REAL_KW,
    BOOLEAN_KW,
    CHAR_KW,
    STRING_KW,
    BYTE_KW,
    BYTES_KW,
    TRUE_KW,
    FALSE_KW,
    IF_KW,
    THEN_KW,
    ELSE_KW,
    CASE_KW,
    FOR_KW,
    TO_KW,
    DOWNTO_KW,
    DO_KW,
    IN_KW,
    WHILE_KW,
    REPEAT_KW,
    UNTIL_KW,
    LOOP_KW,
    PARALLEL_KW,
    BREAK_KW,
    CONTINUE_KW,
    RETURN_KW,
    TRY_KW,
    EXCEPT_KW,
    ON_KW,
    FROM_KW,
    INTO_KW,
    WITH_KW,
    CONSULT_KW,
    ASK_KW,
    EMBED_KW,
    AND_KW,
    OR_KW,
    NOT_KW,
    DIV_KW,
    MOD_KW,

    // ── Operators and punctuation (24) ─────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    /// `:=`
    ASSIGN,
    EQ,
    /// `<>`
    NEQ,
    LT,
    GT,
    LE,
    GE,
    QUESTION,
    BANG,
    COLON,
    SEMICOLON,
    COMMA,
    DOT,
    DOT_DOT,
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,

    // ── Literals (12) ──────────────────────────────────────────────────
    INT_LITERAL,
    REAL_LITERAL,
    STRING_LITERAL,
    CHAR_LITERAL,
    BYTES_LITERAL,
    DURATION_LITERAL,
    MONEY_LITERAL,
    FSTRING_START,
    FSTRING_END,
    STRING_CONTENT,
    INTERPOLATION_START,
    INTERPOLATION_END,

    // ── Identifiers and trivia (3) ─────────────────────────────────────
    IDENT,
    WHITESPACE,
    COMMENT,

    // ── Special (2) ────────────────────────────────────────────────────
    EOF,
    /// Lexer error token.
    ERROR,

    // ── Composite node kinds ───────────────────────────────────────────
    /// Root node of a parsed source file.
    SOURCE_FILE,
    /// Name in a definition position.
    NAME,
    /// Name reference (identifier used as expression).
    NAME_REF,
    /// `uses Foo, Bar;` clause.
    USE_CLAUSE,
    /// `key = value;` item in the config section.
    CONFIG_ITEM,
    /// Named type declaration (alias, record, enum, or schema).
    TYPE_DECL,
    /// Oracle declaration: `Name : Type = 'provider';`
    ORACLE_DECL,
    /// Variable declaration group: `a, b: Type [:= init];`
    VAR_DECL,
    /// Function declaration.
    FUNC_DECL,
    /// Parameter list: `(a, b: Integer; c: String)`
    PARAM_LIST,
    /// One parameter group sharing a type.
    PARAM,
    /// `var` block of function locals.
    VAR_BLOCK,
    /// `begin ... end` statement block.
    BLOCK,

    // ── Type node kinds ────────────────────────────────────────────────
    /// Named or primitive type reference: `Integer`, `Person`.
    TYPE_REF,
    /// `array [lo..hi] of T`
    ARRAY_TYPE,
    /// `(T1, T2, ...)` with at least one non-name element.
    TUPLE_TYPE,
    /// `record ... end`
    RECORD_TYPE,
    /// `(Red, Green, Blue)` -- all elements plain names.
    ENUM_TYPE,
    /// `?T`
    OPTIONAL_TYPE,
    /// `!T`
    RESULT_TYPE,
    /// `Base[min..max]` or `String matching '...'`
    CONSTRAINED_TYPE,
    /// `schema ... end` body.
    SCHEMA_TYPE,
    /// One field in a record or schema: `Name: Type [describe '...'];`
    FIELD_DECL,

    // ── Expression node kinds ──────────────────────────────────────────
    /// Literal expression (number, string, bool, duration, money).
    LITERAL,
    /// Parenthesized expression: `(expr)`.
    PAREN_EXPR,
    /// Unary expression: `-x`, `not x`.
    UNARY_EXPR,
    /// Binary expression: `a + b`, `a and b`.
    BINARY_EXPR,
    /// Function call: `f(args)`.
    CALL_EXPR,
    /// Argument list.
    ARG_LIST,
    /// Index expression: `a[i]` (possibly multi-index).
    INDEX_EXPR,
    /// Slice expression: `a[lo..hi]`. Reserved; not produced yet.
    SLICE_EXPR,
    /// Field access: `expr.field`.
    FIELD_ACCESS,
    /// Tuple literal: `(a, b)`.
    TUPLE_EXPR,
    /// Array literal: `[a, b, c]`.
    ARRAY_EXPR,
    /// Record literal: `{key: value, ...}`.
    RECORD_EXPR,
    /// One `key: value` field in a record literal.
    RECORD_FIELD,
    /// Interpolated f-string expression.
    STRING_EXPR,
    /// One `{expr}` segment inside an f-string.
    INTERPOLATION,
    /// `ask Oracle <- expr ...`
    ASK_EXPR,
    /// `consult Oracle from expr ...`
    CONSULT_EXPR,
    /// `embed Oracle <- expr`
    EMBED_EXPR,
    /// `into Type` clause on ask/consult.
    INTO_CLAUSE,
    /// `else expr` fallback clause.
    ELSE_CLAUSE,
    /// `with cost` marker clause.
    COST_CLAUSE,
    /// `with attempts: N` clause.
    ATTEMPTS_CLAUSE,
    /// `on failure ... end` block.
    ON_FAILURE_CLAUSE,
    /// `retry with hint expr` action.
    RETRY_CLAUSE,
    /// `yield expr` action.
    YIELD_CLAUSE,

    // ── Statement node kinds ───────────────────────────────────────────
    /// Assignment: `target := value`.
    ASSIGN_STMT,
    /// Expression statement.
    EXPR_STMT,
    /// `if cond then S [else S]`
    IF_STMT,
    /// `while cond do S`
    WHILE_STMT,
    /// `repeat S... until cond`
    REPEAT_STMT,
    /// `for V := lo to|downto hi do S`
    FOR_STMT,
    /// `for V in A do S`
    FOR_IN_STMT,
    /// `case E of ... end`
    CASE_STMT,
    /// One `pattern: S;` arm.
    CASE_ARM,
    /// `else: S` arm.
    CASE_ELSE,
    /// `loop S... end`
    LOOP_STMT,
    /// `parallel S... end`
    PARALLEL_STMT,
    /// `break`
    BREAK_STMT,
    /// `continue`
    CONTINUE_STMT,
    /// `return [expr]`
    RETURN_STMT,
    /// `try S... except S... end`
    TRY_STMT,
    /// `except` handler inside a try statement.
    EXCEPT_CLAUSE,
}

impl SyntaxKind {
    /// Whether this kind represents trivia (tokens that don't affect parsing).
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::Program => SyntaxKind::PROGRAM_KW,
            TokenKind::Uses => SyntaxKind::USES_KW,
            TokenKind::Config => SyntaxKind::CONFIG_KW,
            TokenKind::Types => SyntaxKind::TYPES_KW,
            TokenKind::Oracles => SyntaxKind::ORACLES_KW,
            TokenKind::Var => SyntaxKind::VAR_KW,
            TokenKind::Function => SyntaxKind::FUNCTION_KW,
            TokenKind::Begin => SyntaxKind::BEGIN_KW,
            TokenKind::End => SyntaxKind::END_KW,
            TokenKind::Record => SyntaxKind::RECORD_KW,
            TokenKind::Schema => SyntaxKind::SCHEMA_KW,
            TokenKind::Array => SyntaxKind::ARRAY_KW,
            TokenKind::Of => SyntaxKind::OF_KW,
            TokenKind::Tuple => SyntaxKind::TUPLE_KW,
            TokenKind::Integer => SyntaxKind::INTEGER_KW,
            TokenKind::Real => SyntaxKind::REAL_KW,
            TokenKind::Boolean => SyntaxKind::BOOLEAN_KW,
            TokenKind::CharKw => SyntaxKind::CHAR_KW,
            TokenKind::StringKw => SyntaxKind::STRING_KW,
            TokenKind::Byte => SyntaxKind::BYTE_KW,
            TokenKind::Bytes => SyntaxKind::BYTES_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Then => SyntaxKind::THEN_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::Case => SyntaxKind::CASE_KW,
            TokenKind::For => SyntaxKind::FOR_KW,
            TokenKind::To => SyntaxKind::TO_KW,
            TokenKind::Downto => SyntaxKind::DOWNTO_KW,
            TokenKind::Do => SyntaxKind::DO_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,
            TokenKind::Repeat => SyntaxKind::REPEAT_KW,
            TokenKind::Until => SyntaxKind::UNTIL_KW,
            TokenKind::Loop => SyntaxKind::LOOP_KW,
            TokenKind::Parallel => SyntaxKind::PARALLEL_KW,
            TokenKind::Break => SyntaxKind::BREAK_KW,
            TokenKind::Continue => SyntaxKind::CONTINUE_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Try => SyntaxKind::TRY_KW,
            TokenKind::Except => SyntaxKind::EXCEPT_KW,
            TokenKind::On => SyntaxKind::ON_KW,
            TokenKind::From => SyntaxKind::FROM_KW,
            TokenKind::Into => SyntaxKind::INTO_KW,
            TokenKind::With => SyntaxKind::WITH_KW,
            TokenKind::Consult => SyntaxKind::CONSULT_KW,
            TokenKind::Ask => SyntaxKind::ASK_KW,
            TokenKind::Embed => SyntaxKind::EMBED_KW,
            TokenKind::And => SyntaxKind::AND_KW,
            TokenKind::Or => SyntaxKind::OR_KW,
            TokenKind::Not => SyntaxKind::NOT_KW,
            TokenKind::Div => SyntaxKind::DIV_KW,
            TokenKind::Mod => SyntaxKind::MOD_KW,
            // Operators and punctuation
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Assign => SyntaxKind::ASSIGN,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Neq => SyntaxKind::NEQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Le => SyntaxKind::LE,
            TokenKind::Ge => SyntaxKind::GE,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::DotDot => SyntaxKind::DOT_DOT,
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            // Literals
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::RealLiteral => SyntaxKind::REAL_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,
            TokenKind::CharLiteral => SyntaxKind::CHAR_LITERAL,
            TokenKind::BytesLiteral => SyntaxKind::BYTES_LITERAL,
            TokenKind::DurationLiteral => SyntaxKind::DURATION_LITERAL,
            TokenKind::MoneyLiteral => SyntaxKind::MONEY_LITERAL,
            TokenKind::FStringStart => SyntaxKind::FSTRING_START,
            TokenKind::FStringEnd => SyntaxKind::FSTRING_END,
            TokenKind::StringContent => SyntaxKind::STRING_CONTENT,
            TokenKind::InterpolationStart => SyntaxKind::INTERPOLATION_START,
            TokenKind::InterpolationEnd => SyntaxKind::INTERPOLATION_END,
            // Identifiers and trivia
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            // Special
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }

    #[test]
    fn trivia_kinds_identified() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::COMMENT.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
        assert!(!SyntaxKind::SOURCE_FILE.is_trivia());
    }

    #[test]
    fn token_kinds_convert() {
        assert_eq!(SyntaxKind::from(TokenKind::Program), SyntaxKind::PROGRAM_KW);
        assert_eq!(SyntaxKind::from(TokenKind::Assign), SyntaxKind::ASSIGN);
        assert_eq!(SyntaxKind::from(TokenKind::FStringStart), SyntaxKind::FSTRING_START);
        assert_eq!(SyntaxKind::from(TokenKind::Eof), SyntaxKind::EOF);
    }
}
