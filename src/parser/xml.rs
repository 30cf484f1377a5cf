//! Recursive-descent tree builder.

use log::debug;

use super::input::{is_whitespace, ParserInput};
use super::{decode_text, ParseOptions};
use crate::error::ParseError;
use crate::tree::{Attribute, Document, NodeId, NodeKind};

pub(crate) struct XmlParser<'a> {
    input: ParserInput<'a>,
    doc: Document,
    options: &'a ParseOptions,
}

impl<'a> XmlParser<'a> {
    pub fn new(input: &'a str, options: &'a ParseOptions) -> Self {
        // A leading byte order mark only identifies the encoding.
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        Self {
            input: ParserInput::new(input, options.max_depth),
            doc: Document::new(),
            options,
        }
    }

    /// Parses the whole input into a document.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        let root = self.doc.root();
        self.parse_content(root, None)?;
        debug!("parsed document with {} nodes", self.doc.node_count());
        Ok(self.doc)
    }

    /// Parses nodes into `parent` until its end tag or, at the top level,
    /// the end of input. `open` is the name of the enclosing element.
    fn parse_content(&mut self, parent: NodeId, open: Option<&str>) -> Result<(), ParseError> {
        loop {
            if self.input.at_end() {
                return match open {
                    None => Ok(()),
                    Some(name) => Err(self
                        .input
                        .fatal(format!("unexpected end of input: missing </{name}>"))),
                };
            }

            if self.input.looking_at(b"</") {
                if open.is_none() {
                    return Err(self.input.fatal("end tag without matching start tag"));
                }
                return Ok(());
            }

            if self.input.looking_at(b"<?") {
                if self.looking_at_declaration() {
                    self.parse_declaration(parent)?;
                } else {
                    self.parse_processing_instruction(parent)?;
                }
            } else if self.input.looking_at(b"<!--") {
                self.parse_comment(parent)?;
            } else if self.input.looking_at(b"<![CDATA[") {
                self.parse_cdata(parent)?;
            } else if self.input.looking_at(b"<!DOCTYPE") {
                self.parse_doctype(parent)?;
            } else if self.input.looking_at(b"<!") {
                return Err(self.input.fatal("unsupported markup declaration"));
            } else if self.input.peek() == Some(b'<') {
                self.parse_element(parent)?;
            } else {
                self.parse_char_data(parent);
            }
        }
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.doc.create_node(kind);
        self.doc.append_child(parent, id);
        id
    }

    // --- Elements ---

    fn parse_element(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.advance(1);
        let name = self.input.parse_name()?;

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.input.skip_whitespace();
            if self.input.looking_at(b"/>") {
                self.input.advance(2);
                break true;
            }
            if self.input.looking_at(b">") {
                self.input.advance(1);
                break false;
            }
            if self.input.at_end() {
                return Err(self
                    .input
                    .fatal(format!("unexpected end of input in start tag <{name}>")));
            }
            attributes.push(self.parse_attribute()?);
        };

        let id = self.append(
            parent,
            NodeKind::Element {
                name: name.clone(),
                value: String::new(),
                attributes,
            },
        );
        if self_closing {
            return Ok(());
        }

        self.input.increment_depth()?;
        self.parse_content(id, Some(name.as_str()))?;
        self.input.decrement_depth();

        self.input.expect_str("</")?;
        let end_name = self.input.parse_name()?;
        if end_name != name {
            return Err(self.input.fatal(format!(
                "mismatched end tag: expected </{name}>, found </{end_name}>"
            )));
        }
        self.input.skip_whitespace();
        self.input.expect_str(">")
    }

    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let name = self.input.parse_name()?;
        self.input.skip_whitespace();
        if self.input.peek() != Some(b'=') {
            return Err(self
                .input
                .fatal(format!("expected '=' after attribute name '{name}'")));
        }
        self.input.advance(1);
        self.input.skip_whitespace();
        let value = self.parse_quoted_value()?;
        Ok(Attribute::new(name, value))
    }

    fn parse_quoted_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.input.peek() {
            Some(b'"') => "\"",
            Some(b'\'') => "'",
            _ => return Err(self.input.fatal("attribute value must be quoted")),
        };
        self.input.advance(1);
        let raw = self.input.take_until(quote, "attribute value")?;
        Ok(decode_text(raw).into_owned())
    }

    // --- Character data ---

    /// Whitespace handling applies to the decoded text, so character
    /// references to blanks count as blanks.
    fn parse_char_data(&mut self, parent: NodeId) {
        let raw = self.input.take_while(|b| b != b'<');
        let decoded = decode_text(raw);
        if !self.options.keep_blanks && decoded.bytes().all(is_whitespace) {
            return;
        }
        let mut text: &str = &decoded;
        if self.options.trim_whitespace {
            text = text.trim_matches(|c: char| c.is_ascii() && is_whitespace(c as u8));
        }
        if text.is_empty() {
            return;
        }
        self.append(parent, NodeKind::data(text));
    }

    // --- Declarations and processing instructions ---

    fn looking_at_declaration(&self) -> bool {
        self.input.looking_at(b"<?xml")
            && self
                .input
                .peek_at(5)
                .is_some_and(|b| is_whitespace(b) || b == b'?')
    }

    fn parse_declaration(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.advance(5);
        let mut attributes = Vec::new();
        loop {
            self.input.skip_whitespace();
            if self.input.looking_at(b"?>") {
                self.input.advance(2);
                break;
            }
            if self.input.at_end() {
                return Err(self
                    .input
                    .fatal("unterminated XML declaration: missing '?>'"));
            }
            attributes.push(self.parse_attribute()?);
        }
        self.append(parent, NodeKind::Declaration { attributes });
        Ok(())
    }

    fn parse_processing_instruction(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.advance(2);
        let name = self.input.parse_name()?;
        self.input.skip_whitespace();
        let value = self
            .input
            .take_until("?>", "processing instruction")?
            .to_string();
        self.append(parent, NodeKind::ProcessingInstruction { name, value });
        Ok(())
    }

    // --- Comments, CDATA, DOCTYPE ---

    fn parse_comment(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.advance(4);
        let value = self.input.take_until("-->", "comment")?.to_string();
        self.append(parent, NodeKind::Comment { value });
        Ok(())
    }

    fn parse_cdata(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.advance(9);
        let value = self.input.take_until("]]>", "CDATA section")?.to_string();
        self.append(parent, NodeKind::CData { value });
        Ok(())
    }

    /// Keeps the DOCTYPE body verbatim. Brackets around the internal subset
    /// are balanced and quoted literals are skipped, so a `>` inside either
    /// does not end the declaration.
    fn parse_doctype(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.advance(9);
        self.input.skip_whitespace();

        let mut brackets = 0u32;
        let mut quote: Option<u8> = None;
        let value = self
            .input
            .take_while(|b| match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                    }
                    true
                }
                None => match b {
                    b'"' | b'\'' => {
                        quote = Some(b);
                        true
                    }
                    b'[' => {
                        brackets += 1;
                        true
                    }
                    b']' => {
                        brackets = brackets.saturating_sub(1);
                        true
                    }
                    b'>' => brackets > 0,
                    _ => true,
                },
            })
            .to_string();

        if self.input.peek() != Some(b'>') {
            return Err(self
                .input
                .fatal("unterminated DOCTYPE declaration: missing '>'"));
        }
        self.input.advance(1);
        self.append(parent, NodeKind::Doctype { value });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::parser::{parse_str, parse_str_with_options, ParseOptions};
    use crate::tree::{Document, NodeId, NodeKind};
    use pretty_assertions::assert_eq;

    fn kinds(doc: &Document, parent: NodeId) -> Vec<&'static str> {
        doc.children(parent)
            .map(|id| match doc.node(id).kind {
                NodeKind::Document => "document",
                NodeKind::Element { .. } => "element",
                NodeKind::Data { .. } => "data",
                NodeKind::CData { .. } => "cdata",
                NodeKind::Declaration { .. } => "declaration",
                NodeKind::Comment { .. } => "comment",
                NodeKind::Doctype { .. } => "doctype",
                NodeKind::ProcessingInstruction { .. } => "pi",
            })
            .collect()
    }

    #[test]
    fn test_parse_simple_element() {
        let doc = parse_str("<root>hello</root>").unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(doc.node_name(root), Some("root"));
        assert_eq!(doc.node_value(root), Some(""));
        let text = doc.first_child(root).unwrap();
        assert_eq!(doc.node_value(text), Some("hello"));
    }

    #[test]
    fn test_parse_attributes() {
        let doc = parse_str(r#"<a x="1" y = 'two &amp; three' z=""/>"#).unwrap();
        let a = doc.root_element().unwrap();
        assert_eq!(doc.attribute(a, "x"), Some("1"));
        assert_eq!(doc.attribute(a, "y"), Some("two & three"));
        assert_eq!(doc.attribute(a, "z"), Some(""));
        assert!(doc.first_child(a).is_none());
    }

    #[test]
    fn test_parse_prolog_nodes() {
        let input = "<?xml version=\"1.0\"?>\n\
                     <!DOCTYPE note [<!ELEMENT note (#PCDATA)>]>\n\
                     <!-- c -->\n\
                     <?style href=\"a.css\"?>\n\
                     <note/>";
        let doc = parse_str(input).unwrap();
        assert_eq!(
            kinds(&doc, doc.root()),
            vec!["declaration", "doctype", "comment", "pi", "element"]
        );

        let mut children = doc.children(doc.root());
        let decl = children.next().unwrap();
        assert_eq!(doc.attribute(decl, "version"), Some("1.0"));
        let doctype = children.next().unwrap();
        assert_eq!(
            doc.node_value(doctype),
            Some("note [<!ELEMENT note (#PCDATA)>]")
        );
        let comment = children.next().unwrap();
        assert_eq!(doc.node_value(comment), Some(" c "));
        let pi = children.next().unwrap();
        assert_eq!(doc.node_name(pi), Some("style"));
        assert_eq!(doc.node_value(pi), Some("href=\"a.css\""));
    }

    #[test]
    fn test_parse_doctype_with_quoted_gt() {
        let doc = parse_str("<!DOCTYPE x SYSTEM \"a>b.dtd\"><x/>").unwrap();
        let doctype = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_value(doctype), Some("x SYSTEM \"a>b.dtd\""));
    }

    #[test]
    fn test_parse_unterminated_doctype() {
        let err = parse_str("<!DOCTYPE x [ <!ELEMENT x ANY>").unwrap_err();
        assert_eq!(err.message, "unterminated DOCTYPE declaration: missing '>'");
    }

    #[test]
    fn test_pi_named_xml_prefix_is_not_declaration() {
        let doc = parse_str("<?xml-stylesheet type=\"text/xsl\"?><a/>").unwrap();
        assert_eq!(kinds(&doc, doc.root()), vec!["pi", "element"]);
    }

    #[test]
    fn test_parse_cdata_kept_raw() {
        let doc = parse_str("<a><![CDATA[x < y && &amp;]]></a>").unwrap();
        let a = doc.root_element().unwrap();
        let cdata = doc.first_child(a).unwrap();
        assert_eq!(kinds(&doc, a), vec!["cdata"]);
        assert_eq!(doc.node_value(cdata), Some("x < y && &amp;"));
    }

    #[test]
    fn test_blank_text_dropped_by_default() {
        let doc = parse_str("<a>\n  <b/>\n  <c/>\n</a>").unwrap();
        let a = doc.root_element().unwrap();
        assert_eq!(kinds(&doc, a), vec!["element", "element"]);
    }

    #[test]
    fn test_keep_blanks() {
        let opts = ParseOptions::default().keep_blanks(true);
        let doc = parse_str_with_options("<a>\n  <b/>\n</a>", &opts).unwrap();
        let a = doc.root_element().unwrap();
        assert_eq!(kinds(&doc, a), vec!["data", "element", "data"]);
    }

    #[test]
    fn test_trim_whitespace() {
        let opts = ParseOptions::default().trim_whitespace(true);
        let doc = parse_str_with_options("<a>\n  text here \n</a>", &opts).unwrap();
        let a = doc.root_element().unwrap();
        let text = doc.first_child(a).unwrap();
        assert_eq!(doc.node_value(text), Some("text here"));
    }

    #[test]
    fn test_text_entities_decoded() {
        let doc = parse_str("<a>1 &lt; 2 &#x26; &unknown;</a>").unwrap();
        let a = doc.root_element().unwrap();
        let text = doc.first_child(a).unwrap();
        assert_eq!(doc.node_value(text), Some("1 < 2 & &unknown;"));
    }

    #[test]
    fn test_blank_character_reference_is_blank() {
        let doc = parse_str("<a>&#32;&#x9;</a>").unwrap();
        let a = doc.root_element().unwrap();
        assert!(doc.first_child(a).is_none());
    }

    #[test]
    fn test_byte_order_mark_skipped() {
        let doc = parse_str("\u{FEFF}<a/>").unwrap();
        assert_eq!(kinds(&doc, doc.root()), vec!["element"]);
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_str("<a><b></a></b>").unwrap_err();
        assert_eq!(
            err.message,
            "mismatched end tag: expected </b>, found </a>"
        );
    }

    #[test]
    fn test_missing_end_tag() {
        let err = parse_str("<a><b/>").unwrap_err();
        assert_eq!(err.message, "unexpected end of input: missing </a>");
    }

    #[test]
    fn test_stray_end_tag() {
        let err = parse_str("<a/></a>").unwrap_err();
        assert_eq!(err.message, "end tag without matching start tag");
    }

    #[test]
    fn test_unquoted_attribute_value() {
        let err = parse_str("<a x=1/>").unwrap_err();
        assert_eq!(err.message, "attribute value must be quoted");
    }

    #[test]
    fn test_attribute_without_value() {
        let err = parse_str("<a checked/>").unwrap_err();
        assert_eq!(err.message, "expected '=' after attribute name 'checked'");
    }

    #[test]
    fn test_unsupported_markup_declaration() {
        let err = parse_str("<!ELEMENT a ANY><a/>").unwrap_err();
        assert_eq!(err.message, "unsupported markup declaration");
    }

    #[test]
    fn test_max_depth() {
        let opts = ParseOptions::default().max_depth(2);
        assert!(parse_str_with_options("<a><b/></a>", &opts).is_ok());
        assert!(parse_str_with_options("<a><b><c/></b></a>", &opts).is_ok());
        let err = parse_str_with_options("<a><b><c></c></b></a>", &opts).unwrap_err();
        assert_eq!(err.message, "maximum nesting depth exceeded (2)");
    }

    #[test]
    fn test_empty_input_is_empty_document() {
        let doc = parse_str("").unwrap();
        assert!(doc.first_child(doc.root()).is_none());
    }
}
