//! Decoding of quoted string lexemes.
//!
//! The lexer keeps string lexemes raw (quotes and escapes included); this
//! module turns a lexeme into its runtime text. Used by the type checker
//! for `describe`/`matching` annotations and by the IR lowering when it
//! materializes string constants.

/// Decode the escapes `\\ \' \" \n \r \t \xNN` in raw text.
///
/// Unknown escapes keep their backslash, matching the lexer's permissive
/// scanning. Used directly for f-string content runs, which carry neither
/// quotes nor a prefix.
pub fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let code = match (hi, lo) {
                    (Some(h), Some(l)) => u8::from_str_radix(&format!("{h}{l}"), 16).ok(),
                    _ => None,
                };
                match code {
                    Some(b) => out.push(b as char),
                    None => out.push_str("\\x"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Decode a string-like lexeme: strip an optional `b`/`f` prefix and the
/// surrounding single quotes, then process the escapes.
pub fn unescape_string(lexeme: &str) -> String {
    let mut body = lexeme;
    if body.starts_with(['b', 'B', 'f', 'F']) {
        body = &body[1..];
    }
    let body = body.strip_prefix('\'').unwrap_or(body);
    let body = body.strip_suffix('\'').unwrap_or(body);
    decode_escapes(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string() {
        assert_eq!(unescape_string("'hello'"), "hello");
        assert_eq!(unescape_string("''"), "");
    }

    #[test]
    fn prefixed_strings() {
        assert_eq!(unescape_string("b'abc'"), "abc");
        assert_eq!(unescape_string("F'x'"), "x");
    }

    #[test]
    fn escapes() {
        assert_eq!(unescape_string("'a\\nb'"), "a\nb");
        assert_eq!(unescape_string("'tab\\there'"), "tab\there");
        assert_eq!(unescape_string("'q\\'q'"), "q'q");
        assert_eq!(unescape_string("'back\\\\slash'"), "back\\slash");
        assert_eq!(unescape_string("'\\x41'"), "A");
    }

    #[test]
    fn unknown_escape_keeps_backslash() {
        assert_eq!(unescape_string("'a\\qb'"), "a\\qb");
    }

    #[test]
    fn content_without_quotes_keeps_leading_letters() {
        // F-string content runs are raw text; no prefix stripping applies.
        assert_eq!(decode_escapes("bob"), "bob");
        assert_eq!(decode_escapes("fa\\nb"), "fa\nb");
    }
}
