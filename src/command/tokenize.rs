// src/command/tokenize.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ParseError;

/// A quoted run (single or double, no escapes, no nesting) or a run of
/// non-whitespace characters. Quoted alternatives are tried first so that
/// `'foo bar'` stays one token.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'[^']*'|"[^"]*"|\S+"#).expect("token pattern is a valid regex")
});

/// Split `line` into tokens, stripping the surrounding quotes of quoted
/// tokens.
///
/// ```
/// use edi::command::tokenize;
///
/// assert_eq!(tokenize("'foo bar' baz"), vec!["foo bar", "baz"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(line)
        .map(|m| strip_quotes(m.as_str()).to_string())
        .collect()
}

/// Tokenize and insist on at least one token (the program name).
pub fn parse_argv(line: &str) -> Result<Vec<String>, ParseError> {
    let argv = tokenize(line);
    if argv.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(argv)
}

fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'\'' || first == b'"') && first == last {
            return &token[1..token.len() - 1];
        }
    }
    token
}
