use crate::error::{PathError, Result};
use crate::node::Node;
use crate::path::{PathNode, TagPath};
use crate::reader::StringReader;
use crate::snbt;

/// Parse a whole string as a path.
pub fn parse(input: &str) -> Result<TagPath> {
    let mut reader = StringReader::new(input);
    let path = parse_from(&mut reader)?;
    if reader.can_read() {
        return Err(reader.error("Unexpected trailing data after path"));
    }
    Ok(path)
}

/// Parse a path starting at the reader's cursor, stopping at the first
/// space (or the end of input). The cursor is left on that space.
pub fn parse_from(reader: &mut StringReader<'_>) -> Result<TagPath> {
    let start = reader.cursor();
    let mut nodes = Vec::new();
    let mut first = true;

    while reader.can_read() && reader.peek() != Some(' ') {
        let node = parse_node(reader, first)?;
        nodes.push(PathNode {
            node,
            end: reader.cursor() - start,
        });
        first = false;

        match reader.peek() {
            None | Some(' ' | '[' | '{') => {}
            Some(_) => reader.expect('.')?,
        }
    }

    if nodes.is_empty() {
        return Err(invalid_node(reader));
    }

    let original = reader.input()[start..reader.cursor()].to_string();
    tracing::trace!(path = %original, nodes = nodes.len(), "parsed tag path");
    Ok(TagPath::new(original, nodes))
}

// ── Node Dispatch ─────────────────────────────────────────────────

fn parse_node(reader: &mut StringReader<'_>, first: bool) -> Result<Node> {
    match reader.peek() {
        Some('{') => {
            if !first {
                return Err(invalid_node(reader));
            }
            let pattern = snbt::parse_compound(reader)?;
            Ok(Node::MatchRootObject { pattern })
        }
        Some('[') => {
            reader.skip();
            match reader.peek() {
                Some('{') => {
                    let pattern = snbt::parse_compound(reader)?;
                    reader.expect(']')?;
                    Ok(Node::MatchElement { pattern })
                }
                Some(']') => {
                    reader.skip();
                    Ok(Node::AllElements)
                }
                _ => {
                    let at = reader.cursor();
                    let index = reader
                        .read_int()
                        .map_err(|_| PathError::InvalidNode { offset: at })?;
                    reader.expect(']')?;
                    Ok(Node::IndexedElement { index })
                }
            }
        }
        Some('"' | '\'') => {
            let name = reader.read_quoted_string()?;
            parse_object_node(reader, name)
        }
        _ => {
            let name = parse_unquoted_name(reader)?;
            parse_object_node(reader, name)
        }
    }
}

/// A key, optionally followed by a `{pattern}` that turns it into a match.
fn parse_object_node(reader: &mut StringReader<'_>, name: String) -> Result<Node> {
    if reader.peek() == Some('{') {
        let pattern = snbt::parse_compound(reader)?;
        Ok(Node::MatchObject { name, pattern })
    } else {
        Ok(Node::CompoundChild { name })
    }
}

fn parse_unquoted_name(reader: &mut StringReader<'_>) -> Result<String> {
    let name = reader.read_while(is_allowed_in_unquoted_name);
    if name.is_empty() {
        return Err(invalid_node(reader));
    }
    Ok(name.to_string())
}

fn invalid_node(reader: &StringReader<'_>) -> PathError {
    PathError::InvalidNode {
        offset: reader.cursor(),
    }
}

/// Check if a character may appear in an unquoted key.
fn is_allowed_in_unquoted_name(ch: char) -> bool {
    !matches!(ch, ' ' | '"' | '\'' | '[' | ']' | '.' | '{' | '}')
}
