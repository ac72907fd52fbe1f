//! Statement parsing for the built-in plot script language.
//!
//! The language is deliberately tiny: one statement per line, either a
//! literal or a call such as `plt.plot([1, 2, 3])` or
//! `configure(close=False)`. Dotted call names resolve to their last
//! segment.

use thiserror::Error;

/// Statement that could not be parsed. Reported to the script, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SyntaxError: {0}")]
pub struct SyntaxError(String);

/// One call argument, kept as source text until the callee interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Positional(String),
    Keyword(String, String),
}

/// A parsed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Blank line, comment, `pass` or an import.
    Nop,
    /// A string or number literal evaluated for its value.
    Literal(String),
    /// A function call.
    Call { name: String, args: Vec<Arg> },
}

/// Parse a single statement.
pub fn parse_statement(source: &str) -> Result<Statement, SyntaxError> {
    let s = source.trim();
    if s.is_empty()
        || s.starts_with('#')
        || s == "pass"
        || s.starts_with("import ")
        || s.starts_with("from ")
    {
        return Ok(Statement::Nop);
    }

    if let Some(text) = parse_string(s) {
        return Ok(Statement::Literal(text));
    }
    if s.parse::<f64>().is_ok() {
        return Ok(Statement::Literal(s.to_string()));
    }

    let open = s
        .find('(')
        .ok_or_else(|| SyntaxError(format!("invalid syntax: {s}")))?;
    if !s.ends_with(')') {
        return Err(SyntaxError(format!("unexpected EOF while parsing: {s}")));
    }

    let path = s[..open].trim();
    if path.is_empty()
        || !path
            .split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'))
    {
        return Err(SyntaxError(format!("invalid syntax: {s}")));
    }
    let name = path.rsplit('.').next().unwrap_or(path).to_string();
    let args = split_args(&s[open + 1..s.len() - 1])?;

    Ok(Statement::Call { name, args })
}

/// Split an argument list on top-level commas.
fn split_args(src: &str) -> Result<Vec<Arg>, SyntaxError> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in src.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(SyntaxError(format!("unmatched '{c}'")));
                }
            }
            ',' if depth == 0 => {
                pieces.push(&src[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(SyntaxError("EOL while scanning string literal".to_string()));
    }
    if depth != 0 {
        return Err(SyntaxError("unexpected EOF while parsing".to_string()));
    }
    pieces.push(&src[start..]);

    // A single trailing comma is allowed, as is an empty list.
    if pieces.last().is_some_and(|p| p.trim().is_empty()) {
        pieces.pop();
    }

    pieces
        .into_iter()
        .map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return Err(SyntaxError("invalid syntax: empty argument".to_string()));
            }
            Ok(match keyword_split(piece) {
                Some((key, value)) => Arg::Keyword(key.to_string(), value.to_string()),
                None => Arg::Positional(piece.to_string()),
            })
        })
        .collect()
}

/// `key=value` where `key` is an identifier.
fn keyword_split(piece: &str) -> Option<(&str, &str)> {
    let (key, value) = piece.split_once('=')?;
    let key = key.trim();
    let is_ident = !key.is_empty()
        && key.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !key.starts_with(|c: char| c.is_ascii_digit());
    (is_ident && !value.starts_with('=')).then(|| (key, value.trim()))
}

/// Parse a quoted string literal, returning its unescaped contents.
pub fn parse_string(s: &str) -> Option<String> {
    let quote = s.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = s.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                other => out.push(other),
            },
            c if c == quote => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

/// Parse a `[1, 2.5, 3]` (or tuple) literal of finite numbers.
pub fn parse_number_list(s: &str) -> Option<Vec<f64>> {
    let s = s.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .or_else(|| s.strip_prefix('(').and_then(|r| r.strip_suffix(')')))?;

    let mut items: Vec<&str> = inner.split(',').map(str::trim).collect();
    if items.last().is_some_and(|item| item.is_empty()) {
        items.pop();
    }
    items
        .into_iter()
        .map(|item| item.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}
