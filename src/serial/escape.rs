//! Character-level output primitives.
//!
//! These helpers copy ranges into a [`Sink`]. They know nothing about
//! nodes or indentation policy.

use super::Sink;

/// Returns the named entity reference for a reserved character.
#[inline]
fn entity_for(byte: u8) -> Option<&'static str> {
    match byte {
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'\'' => Some("&apos;"),
        b'"' => Some("&quot;"),
        b'&' => Some("&amp;"),
        _ => None,
    }
}

/// Copies `text` verbatim.
///
/// Used for ranges that are already syntax-safe in their position: names,
/// comment, CDATA, doctype and processing-instruction bodies.
#[inline]
pub fn copy_chars<S: Sink>(out: &mut S, text: &str) -> Result<(), S::Error> {
    if text.is_empty() {
        return Ok(());
    }
    out.put_str(text)
}

/// Copies `text`, expanding `<`, `>`, `'`, `"` and `&` into their named
/// entity references.
///
/// Everything else is passed through untouched, including control and
/// non-ASCII characters. Unreserved runs are handed to the sink in one
/// piece.
pub fn copy_and_expand_chars<S: Sink>(out: &mut S, text: &str) -> Result<(), S::Error> {
    let bytes = text.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        // All reserved characters are ASCII, so `i` is always a char boundary.
        if let Some(entity) = entity_for(b) {
            if start < i {
                out.put_str(&text[start..i])?;
            }
            out.put_str(entity)?;
            start = i + 1;
        }
    }
    if start < bytes.len() {
        out.put_str(&text[start..])?;
    }
    Ok(())
}

/// Writes `n` copies of `unit`.
#[inline]
pub fn fill_chars<S: Sink>(out: &mut S, n: usize, unit: char) -> Result<(), S::Error> {
    for _ in 0..n {
        out.put(unit)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expand(text: &str) -> String {
        let mut out = String::new();
        copy_and_expand_chars(&mut out, text).unwrap();
        out
    }

    #[test]
    fn test_expand_all_reserved() {
        assert_eq!(expand("<>'\"&"), "&lt;&gt;&apos;&quot;&amp;");
    }

    #[test]
    fn test_expand_mixed_text() {
        assert_eq!(
            expand("if a < b && c > \"d\" then"),
            "if a &lt; b &amp;&amp; c &gt; &quot;d&quot; then"
        );
    }

    #[test]
    fn test_expand_leaves_other_units_alone() {
        assert_eq!(expand("tab\there\nnewline é ☃"), "tab\there\nnewline é ☃");
        assert_eq!(expand("\u{1}\r"), "\u{1}\r");
    }

    #[test]
    fn test_expand_existing_entity_is_escaped_again() {
        assert_eq!(expand("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_expand_empty() {
        assert_eq!(expand(""), "");
    }

    #[test]
    fn test_expand_reserved_next_to_multibyte() {
        assert_eq!(expand("é<ü"), "é&lt;ü");
    }

    #[test]
    fn test_copy_is_verbatim() {
        let mut out = String::new();
        copy_chars(&mut out, "a < b & 'c'").unwrap();
        assert_eq!(out, "a < b & 'c'");
    }

    #[test]
    fn test_fill_chars() {
        let mut out = String::new();
        fill_chars(&mut out, 3, '\t').unwrap();
        assert_eq!(out, "\t\t\t");

        let mut out = String::new();
        fill_chars(&mut out, 0, '\t').unwrap();
        assert_eq!(out, "");
    }
}
