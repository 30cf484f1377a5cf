//! Low-level input handling for the parser.
//!
//! [`ParserInput`] owns the cursor into the source text, tracks line and
//! column for diagnostics, and provides the scanning primitives the
//! recursive-descent parser is built from. Every delimiter it stops on is
//! ASCII, so all slices it hands out fall on UTF-8 character boundaries.

use memchr::memmem;

use crate::error::{ParseError, SourceLocation};

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// Returns `true` for the four XML whitespace bytes.
#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Returns `true` for bytes that end a tag, attribute or PI target name.
#[inline]
fn is_name_terminator(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'/' | b'>' | b'=' | b'<' | b'?' | b'"' | b'\'')
}

/// Cursor over the source text.
pub(crate) struct ParserInput<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    depth: u32,
    max_depth: u32,
}

impl<'a> ParserInput<'a> {
    pub fn new(text: &'a str, max_depth: u32) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth,
        }
    }

    // -- Depth tracking --

    /// Increments the nesting depth. Returns an error if the limit is exceeded.
    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fatal(format!(
                "maximum nesting depth exceeded ({})",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Position queries --

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    // -- Peek / lookahead --

    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(self.pos + offset).copied()
    }

    /// Returns `true` if the remaining input starts with `s`.
    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.bytes()[self.pos..].starts_with(s)
    }

    // -- Advance --

    /// Advances by `count` bytes, updating line and column.
    pub fn advance(&mut self, count: usize) {
        let end = (self.pos + count).min(self.text.len());
        for &b in &self.bytes()[self.pos..end] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if b & 0xC0 != 0x80 {
                // Count characters, not UTF-8 continuation bytes.
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Consumes `expected` or fails with a message naming it.
    pub fn expect_str(&mut self, expected: &str) -> Result<(), ParseError> {
        if !self.looking_at(expected.as_bytes()) {
            if self.at_end() {
                return Err(self.fatal(format!("expected '{expected}', found end of input")));
            }
            return Err(self.fatal(format!("expected '{expected}'")));
        }
        self.advance(expected.len());
        Ok(())
    }

    /// Skips whitespace. Returns `true` if any was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        let len = self.bytes()[self.pos..]
            .iter()
            .take_while(|&&b| is_whitespace(b))
            .count();
        self.advance(len);
        self.pos > start
    }

    /// Consumes bytes while `pred` holds and returns them.
    ///
    /// `pred` must only reject ASCII bytes.
    pub fn take_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'a str {
        let start = self.pos;
        let len = self.bytes()[self.pos..]
            .iter()
            .take_while(|&&b| pred(b))
            .count();
        self.advance(len);
        &self.text[start..self.pos]
    }

    /// Consumes everything up to `delimiter`, then the delimiter itself, and
    /// returns the text before it.
    pub fn take_until(&mut self, delimiter: &str, construct: &str) -> Result<&'a str, ParseError> {
        let start = self.pos;
        let Some(offset) = memmem::find(&self.bytes()[start..], delimiter.as_bytes()) else {
            return Err(self.fatal(format!("unterminated {construct}: missing '{delimiter}'")));
        };
        self.advance(offset + delimiter.len());
        Ok(&self.text[start..start + offset])
    }

    /// Parses a tag, attribute or PI target name.
    ///
    /// Names are not validated beyond being non-empty.
    pub fn parse_name(&mut self) -> Result<String, ParseError> {
        let name = self.take_while(|b| !is_name_terminator(b));
        if name.is_empty() {
            return Err(self.fatal("expected a name"));
        }
        Ok(name.to_string())
    }

    /// Creates a fatal error at the current location.
    pub fn fatal(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.location(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_peek_and_advance() {
        let mut input = ParserInput::new("<a>", DEFAULT_MAX_DEPTH);
        assert_eq!(input.peek(), Some(b'<'));
        assert_eq!(input.peek_at(1), Some(b'a'));
        input.advance(3);
        assert!(input.at_end());
        assert_eq!(input.peek(), None);
    }

    #[test]
    fn test_line_column_tracking() {
        let mut input = ParserInput::new("ab\ncé\nx", DEFAULT_MAX_DEPTH);
        input.advance(3);
        assert_eq!(input.location().line, 2);
        assert_eq!(input.location().column, 1);
        // 'c' plus the two bytes of 'é' count as two columns.
        input.advance(3);
        assert_eq!(input.location().column, 3);
        assert_eq!(input.location().byte_offset, 6);
    }

    #[test]
    fn test_take_until() {
        let mut input = ParserInput::new(" body -->rest", DEFAULT_MAX_DEPTH);
        assert_eq!(input.take_until("-->", "comment").unwrap(), " body ");
        assert!(input.looking_at(b"rest"));
    }

    #[test]
    fn test_take_until_missing_delimiter() {
        let mut input = ParserInput::new("no end", DEFAULT_MAX_DEPTH);
        let err = input.take_until("]]>", "CDATA section").unwrap_err();
        assert_eq!(err.message, "unterminated CDATA section: missing ']]>'");
    }

    #[test]
    fn test_parse_name() {
        let mut input = ParserInput::new("svg:rect x=", DEFAULT_MAX_DEPTH);
        assert_eq!(input.parse_name().unwrap(), "svg:rect");
        assert!(input.skip_whitespace());
        assert_eq!(input.parse_name().unwrap(), "x");
        assert!(input.looking_at(b"="));
    }

    #[test]
    fn test_parse_name_empty() {
        let mut input = ParserInput::new(">", DEFAULT_MAX_DEPTH);
        assert!(input.parse_name().is_err());
    }

    #[test]
    fn test_expect_str() {
        let mut input = ParserInput::new("</a>", DEFAULT_MAX_DEPTH);
        input.expect_str("</").unwrap();
        let err = input.expect_str(">").unwrap_err();
        assert_eq!(err.message, "expected '>'");
        assert_eq!(err.location.column, 3);
    }

    #[test]
    fn test_depth_limit() {
        let mut input = ParserInput::new("", 1);
        input.increment_depth().unwrap();
        assert!(input.increment_depth().is_err());
        input.decrement_depth();
        input.decrement_depth();
        input.increment_depth().unwrap();
    }
}
