//! Stringified tag literals: the `{...}` patterns embedded in paths and the
//! values handed to the command-line tool.
//!
//! Compounds, lists, quoted strings and unquoted values are supported.
//! Unquoted values are typed by their suffix (`1b`, `2s`, `3`, `4L`, `1.5f`,
//! `2.5d` or `2.5`); `true`/`false` become bytes, and anything that fails to
//! parse as a number stays a string.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::reader::StringReader;
use crate::tree::{Compound, Scalar, Tag, MAX_DEPTH};

static DOUBLE_NO_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[-+]?(?:[0-9]+[.]|[0-9]*[.][0-9]+)(?:e[-+]?[0-9]+)?$").unwrap());
static DOUBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[-+]?(?:[0-9]+[.]?|[0-9]*[.][0-9]+)(?:e[-+]?[0-9]+)?d$").unwrap());
static FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[-+]?(?:[0-9]+[.]?|[0-9]*[.][0-9]+)(?:e[-+]?[0-9]+)?f$").unwrap());
static BYTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[-+]?(?:0|[1-9][0-9]*)b$").unwrap());
static LONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[-+]?(?:0|[1-9][0-9]*)l$").unwrap());
static SHORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[-+]?(?:0|[1-9][0-9]*)s$").unwrap());
static INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").unwrap());
static SIMPLE_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._+-]+$").unwrap());

/// Parse a complete literal. Trailing non-whitespace input is an error.
pub fn parse_tag(input: &str) -> Result<Tag> {
    let mut reader = StringReader::new(input);
    let tag = read_value(&mut reader, 0)?;
    reader.skip_whitespace();
    if reader.can_read() {
        return Err(reader.error("Unexpected trailing data"));
    }
    Ok(tag)
}

/// Parse a `{...}` compound starting at the reader's cursor, leaving the
/// cursor just past the closing brace.
pub fn parse_compound(reader: &mut StringReader<'_>) -> Result<Compound> {
    let depth = enter(reader, 0)?;
    read_compound(reader, depth)
}

/// Containers may nest at most `MAX_DEPTH` levels.
fn enter(reader: &StringReader<'_>, depth: usize) -> Result<usize> {
    if depth >= MAX_DEPTH {
        return Err(reader.error(format!("Nesting deeper than {} levels", MAX_DEPTH)));
    }
    Ok(depth + 1)
}

fn read_compound(reader: &mut StringReader<'_>, depth: usize) -> Result<Compound> {
    reader.expect('{')?;
    reader.skip_whitespace();
    let mut compound = Compound::new();
    while reader.can_read() && reader.peek() != Some('}') {
        let key = read_key(reader)?;
        reader.skip_whitespace();
        reader.expect(':')?;
        let value = read_value(reader, depth)?;
        compound.insert(key, value);
        if !has_element_separator(reader) {
            break;
        }
        if !reader.can_read() {
            return Err(reader.error("Expected key"));
        }
    }
    reader.skip_whitespace();
    reader.expect('}')?;
    Ok(compound)
}

fn read_key(reader: &mut StringReader<'_>) -> Result<String> {
    reader.skip_whitespace();
    if !reader.can_read() {
        return Err(reader.error("Expected key"));
    }
    let key = match reader.peek() {
        Some('"' | '\'') => reader.read_quoted_string()?,
        _ => reader.read_while(is_unquoted_char).to_string(),
    };
    if key.is_empty() {
        return Err(reader.error("Expected key"));
    }
    Ok(key)
}

/// `depth` is the number of containers already open around the value.
fn read_value(reader: &mut StringReader<'_>, depth: usize) -> Result<Tag> {
    reader.skip_whitespace();
    match reader.peek() {
        None => Err(reader.error("Expected value")),
        Some('{') => {
            let depth = enter(reader, depth)?;
            read_compound(reader, depth).map(Tag::Compound)
        }
        Some('[') => {
            let depth = enter(reader, depth)?;
            read_list(reader, depth)
        }
        Some('"' | '\'') => reader.read_quoted_string().map(Tag::string),
        Some(_) => {
            let start = reader.cursor();
            let token = reader.read_while(is_unquoted_char);
            if token.is_empty() {
                reader.set_cursor(start);
                return Err(reader.error("Expected value"));
            }
            Ok(type_unquoted(token))
        }
    }
}

fn read_list(reader: &mut StringReader<'_>, depth: usize) -> Result<Tag> {
    reader.expect('[')?;
    reader.skip_whitespace();
    if !reader.can_read() {
        return Err(reader.error("Expected value"));
    }
    let mut items = Vec::new();
    while reader.peek() != Some(']') {
        items.push(read_value(reader, depth)?);
        if !has_element_separator(reader) {
            break;
        }
        if !reader.can_read() {
            return Err(reader.error("Expected value"));
        }
    }
    reader.skip_whitespace();
    reader.expect(']')?;
    Ok(Tag::List(items))
}

fn has_element_separator(reader: &mut StringReader<'_>) -> bool {
    reader.skip_whitespace();
    if reader.eat(',') {
        reader.skip_whitespace();
        true
    } else {
        false
    }
}

/// Pick a scalar type for an unquoted token.
fn type_unquoted(token: &str) -> Tag {
    let without_suffix = &token[..token.len() - 1];
    let typed = if FLOAT.is_match(token) {
        without_suffix.parse().ok().map(Scalar::Float)
    } else if BYTE.is_match(token) {
        without_suffix.parse().ok().map(Scalar::Byte)
    } else if LONG.is_match(token) {
        without_suffix.parse().ok().map(Scalar::Long)
    } else if SHORT.is_match(token) {
        without_suffix.parse().ok().map(Scalar::Short)
    } else if INT.is_match(token) {
        token.parse().ok().map(Scalar::Int)
    } else if DOUBLE.is_match(token) {
        without_suffix.parse().ok().map(Scalar::Double)
    } else if DOUBLE_NO_SUFFIX.is_match(token) {
        token.parse().ok().map(Scalar::Double)
    } else if token.eq_ignore_ascii_case("true") {
        Some(Scalar::Byte(1))
    } else if token.eq_ignore_ascii_case("false") {
        Some(Scalar::Byte(0))
    } else {
        None
    };
    Tag::Scalar(typed.unwrap_or_else(|| Scalar::String(token.to_string())))
}

fn is_unquoted_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '+')
}

// ── Rendering ──────────────────────────────────────────────────────

/// Quote `s` with whichever quote character needs no escaping, preferring `"`.
pub fn quote_string(s: &str) -> String {
    let quote = if s.contains('"') && !s.contains('\'') {
        '\''
    } else {
        '"'
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        if ch == '\\' || ch == quote {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if SIMPLE_KEY.is_match(key) {
        f.write_str(key)
    } else {
        f.write_str(&quote_string(key))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Byte(v) => write!(f, "{}b", v),
            Scalar::Short(v) => write!(f, "{}s", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Long(v) => write!(f, "{}L", v),
            Scalar::Float(v) => write!(f, "{:?}f", v),
            Scalar::Double(v) => write!(f, "{:?}d", v),
            Scalar::String(s) => f.write_str(&quote_string(s)),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Scalar(s) => fmt::Display::fmt(s, f),
            Tag::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            Tag::Compound(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_key(f, key)?;
                    f.write_str(":")?;
                    fmt::Display::fmt(value, f)?;
                }
                f.write_str("}")
            }
        }
    }
}
