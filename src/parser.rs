// src/parser.rs
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    InvalidSyntax(String),
}

/// Character cursor over one dot segment of a path.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn parse_int(&mut self) -> Result<i64, ParseError> {
        let start = self.i;
        if self.peek_char() == Some('-') {
            self.i += 1;
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.i == start || (self.i == start + 1 && &self.s[start..self.i] == "-") {
            return Err(ParseError::InvalidSyntax("expected integer".into()));
        }
        self.s[start..self.i]
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidSyntax("bad integer".into()))
    }

    /// Consume everything up to (not including) `end`, or to end of input.
    pub fn take_until(&mut self, end: char) -> &'a str {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == end {
                break;
            }
            self.i += c.len_utf8();
        }
        &self.s[start..self.i]
    }

    pub fn capture_until(&mut self, end: char) -> Result<&'a str, ParseError> {
        let captured = self.take_until(end);
        if self.peek_char() != Some(end) {
            return Err(ParseError::InvalidSyntax(format!("expected '{end}'")));
        }
        Ok(captured)
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}

/// Parse the whole of `s` as a signed integer literal (`-?\d+`).
pub fn int_literal(s: &str) -> Option<i64> {
    let mut p = Parser::new(s);
    let n = p.parse_int().ok()?;
    p.eof().then_some(n)
}

/// Split `key[a][b]` into the key part and each bracket's raw content.
///
/// Returns `None` unless the segment ends in one or more complete bracket
/// groups with nothing in between or after them.
pub fn split_brackets(s: &str) -> Option<(&str, Vec<&str>)> {
    let mut p = Parser::new(s);
    let key = p.take_until('[');
    if p.eof() {
        return None;
    }
    let mut groups = Vec::new();
    while !p.eof() {
        match bracket_group(&mut p) {
            Ok(content) => groups.push(content),
            Err(err) => {
                trace!(segment = s, %err, "not a bracket segment");
                return None;
            }
        }
    }
    Some((key, groups))
}

fn bracket_group<'a>(p: &mut Parser<'a>) -> Result<&'a str, ParseError> {
    p.expect('[')?;
    let content = p.capture_until(']')?;
    p.expect(']')?;
    Ok(content)
}
