//! XML parser.
//!
//! A small recursive descent parser that builds a [`Document`] tree for the
//! printer to work on. It is not validating: names are accepted as written,
//! DTDs are kept as opaque DOCTYPE text and only the predefined entities
//! and character references are decoded.
//!
//! By default whitespace-only text runs are dropped, so indented input
//! prints back in the printer's own layout.

pub(crate) mod input;
mod xml;

use std::borrow::Cow;

use log::debug;
use memchr::memchr;

use crate::error::ParseError;
use crate::tree::Document;

use input::DEFAULT_MAX_DEPTH;

/// Parse options controlling whitespace handling and nesting limits.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use xmlprint::parser::ParseOptions;
///
/// let opts = ParseOptions::default().keep_blanks(true).max_depth(64);
/// assert!(opts.keep_blanks);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// If true, whitespace-only text runs become data nodes.
    pub keep_blanks: bool,
    /// If true, leading and trailing whitespace is trimmed from text runs.
    pub trim_whitespace: bool,
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_blanks: false,
            trim_whitespace: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Keeps or drops whitespace-only text runs.
    #[must_use]
    pub fn keep_blanks(mut self, yes: bool) -> Self {
        self.keep_blanks = yes;
        self
    }

    /// Enables or disables trimming of text runs.
    #[must_use]
    pub fn trim_whitespace(mut self, yes: bool) -> Self {
        self.trim_whitespace = yes;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }
}

/// Parses an XML string with default options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed.
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parses an XML string with the given options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed or nests deeper
/// than `options.max_depth`.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    xml::XmlParser::new(input, options).parse()
}

/// Decodes the five predefined entity references and numeric character
/// references in `text`.
///
/// References that are unknown, malformed or name an invalid code point are
/// kept verbatim. Text without any `&` is returned borrowed.
///
/// ```
/// use xmlprint::parser::decode_text;
///
/// assert_eq!(decode_text("a &lt; b &#x26; c"), "a < b & c");
/// assert_eq!(decode_text("&nbsp;"), "&nbsp;");
/// ```
pub fn decode_text(text: &str) -> Cow<'_, str> {
    let Some(first) = memchr(b'&', text.as_bytes()) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut rest = &text[first..];

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let resolved = rest
            .find(';')
            .and_then(|semi| resolve_reference(&rest[1..semi]).map(|c| (c, semi)));
        match resolved {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                debug!(
                    "keeping unresolved reference at byte {} verbatim",
                    text.len() - rest.len()
                );
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Resolves the body of a reference, the text between `&` and `;`.
fn resolve_reference(body: &str) -> Option<char> {
    match body {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) if is_all(hex, |b| b.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                None if is_all(digits, |b| b.is_ascii_digit()) => digits.parse().ok()?,
                _ => return None,
            };
            char::from_u32(code).filter(|&c| c != '\0')
        }
    }
}

fn is_all(s: &str, pred: impl Fn(u8) -> bool) -> bool {
    !s.is_empty() && s.bytes().all(pred)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_borrows_plain_text() {
        assert!(matches!(decode_text("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_predefined_entities() {
        assert_eq!(
            decode_text("&lt;&gt;&amp;&apos;&quot;"),
            "<>&'\""
        );
    }

    #[test]
    fn test_decode_character_references() {
        assert_eq!(decode_text("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_text("snow&#x2603;man"), "snow\u{2603}man");
    }

    #[test]
    fn test_decode_keeps_unknown_references() {
        assert_eq!(decode_text("&nbsp;x"), "&nbsp;x");
        assert_eq!(decode_text("fish & chips"), "fish & chips");
        assert_eq!(decode_text("trailing &"), "trailing &");
        assert_eq!(decode_text("&#xD800;"), "&#xD800;");
        assert_eq!(decode_text("&#0;"), "&#0;");
        assert_eq!(decode_text("&#+65;"), "&#+65;");
    }

    #[test]
    fn test_decode_does_not_double_decode() {
        assert_eq!(decode_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_mixed_with_multibyte() {
        assert_eq!(decode_text("é&amp;ü &x; ☃"), "é&ü &x; ☃");
    }

    #[test]
    fn test_options_builder() {
        let opts = ParseOptions::default()
            .keep_blanks(true)
            .trim_whitespace(true)
            .max_depth(8);
        assert!(opts.keep_blanks);
        assert!(opts.trim_whitespace);
        assert_eq!(opts.max_depth, 8);
        assert_eq!(ParseOptions::default().max_depth, 256);
    }

    #[test]
    fn test_parse_str_error_location() {
        let err = parse_str("<a>\n  <b></a>").unwrap_err();
        assert_eq!(err.location.line, 2);
        assert!(err.message.contains("mismatched end tag"), "{err}");
    }
}
