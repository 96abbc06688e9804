use crate::error::{PathError, Result};

/// Cursor over a command string, shared by the path parser and the
/// literal parser. All offsets are byte offsets into `input`.
#[derive(Debug, Clone)]
pub struct StringReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> StringReader<'a> {
    pub fn new(input: &'a str) -> Self {
        StringReader { input, pos: 0 }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn cursor(&self) -> usize {
        self.pos
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn can_read(&self) -> bool {
        self.pos < self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advance past the current character, if any.
    pub fn skip(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(format!("Expected '{}'", ch)))
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Create a syntax error at the current position.
    pub fn error(&self, message: impl Into<String>) -> PathError {
        PathError::syntax(message, self.pos)
    }

    /// Consume characters while `allowed` holds and return them.
    pub fn read_while(&mut self, allowed: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if allowed(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    // ── Numbers ─────────────────────────────────────────────────────

    pub fn read_int(&mut self) -> Result<i32> {
        let start = self.pos;
        let number = self.read_while(is_number_char);
        if number.is_empty() {
            return Err(self.error("Expected integer"));
        }
        number.parse::<i32>().map_err(|_| {
            self.pos = start;
            PathError::syntax(format!("Invalid integer '{}'", number), start)
        })
    }

    // ── Strings ─────────────────────────────────────────────────────

    /// Read a string delimited by `"` or `'`. Only the delimiter and the
    /// backslash itself may be escaped.
    pub fn read_quoted_string(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("Expected quote to start a string")),
        };
        self.skip();
        let mut result = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("Unclosed quoted string")),
                Some('\\') => {
                    self.skip();
                    match self.peek() {
                        Some(ch) if ch == quote || ch == '\\' => {
                            self.skip();
                            result.push(ch);
                        }
                        Some(ch) => {
                            return Err(self.error(format!("Invalid escape sequence '\\{}'", ch)));
                        }
                        None => return Err(self.error("Unclosed quoted string")),
                    }
                }
                Some(ch) if ch == quote => {
                    self.skip();
                    return Ok(result);
                }
                Some(ch) => {
                    self.skip();
                    result.push(ch);
                }
            }
        }
    }
}

fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.' || ch == '-'
}
