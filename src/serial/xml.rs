//! XML printer.
//!
//! Walks a `Document` depth-first and writes markup into a [`Sink`]. Text
//! content and attribute values are escaped. Names and the bodies of comments,
//! CDATA sections, doctypes and processing instructions are copied verbatim.
//!
//! With indenting on (the default), every node starts with one indentation
//! unit per enclosing element and ends with a line break. An element whose
//! only child is a text node, or which has no children at all, stays on one
//! line.

use std::convert::Infallible;
use std::fmt;
use std::io;

use log::trace;

use super::escape::{copy_and_expand_chars, copy_chars, fill_chars};
use super::sink::{FmtSink, IoSink, Sink};
use crate::tree::{Attribute, Document, NodeId, NodeKind};

/// Options controlling printer output.
///
/// # Examples
///
/// ```
/// use xmlprint::Document;
/// use xmlprint::serial::{serialize_with_options, PrintOptions};
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
/// let xml = serialize_with_options(&doc, &PrintOptions::default().no_indenting(true));
/// assert_eq!(xml, "<root><child>Hello</child></root>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Suppress all indentation and trailing line breaks.
    /// Defaults to `false`.
    pub no_indenting: bool,
    /// The unit repeated once per depth level when indenting.
    /// Defaults to a tab.
    pub indent_char: char,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            no_indenting: false,
            indent_char: '\t',
        }
    }
}

impl PrintOptions {
    /// Enables or disables compact output.
    ///
    /// When enabled, nothing is written between nodes: no indentation and no
    /// line breaks.
    #[must_use]
    pub fn no_indenting(mut self, yes: bool) -> Self {
        self.no_indenting = yes;
        self
    }

    /// Sets the indentation unit (e.g. `' '` instead of the default tab).
    /// Only takes effect while indenting.
    #[must_use]
    pub fn indent_char(mut self, unit: char) -> Self {
        self.indent_char = unit;
        self
    }

    fn indenting(&self) -> bool {
        !self.no_indenting
    }
}

/// Prints `node` and its subtree into `out`.
///
/// Pass [`Document::root`] to print a whole document. The sink is returned
/// positioned after the last unit written, so calls can be chained; pass
/// `&mut sink` to keep ownership instead.
///
/// # Errors
///
/// Fails only when the sink does. Output written before the failure stays in
/// the sink.
///
/// # Examples
///
/// ```
/// use xmlprint::Document;
/// use xmlprint::serial::{print, PrintOptions};
///
/// let doc = Document::parse_str("<a><b/><c/></a>").unwrap();
/// let mut out = String::new();
/// print(&mut out, &doc, doc.root(), &PrintOptions::default()).unwrap();
/// assert_eq!(out, "<a>\n\t<b/>\n\t<c/>\n</a>\n");
/// ```
pub fn print<S: Sink>(
    out: S,
    doc: &Document,
    node: NodeId,
    options: &PrintOptions,
) -> Result<S, S::Error> {
    trace!(
        "printing node {} (no_indenting: {})",
        node.into_raw(),
        options.no_indenting
    );
    let mut printer = Printer { doc, options, out };
    printer.print_node(node, 0)?;
    Ok(printer.out)
}

/// Writes `node` to a byte stream with default options.
///
/// Each code unit goes straight to `writer`; wrap files and sockets in an
/// [`io::BufWriter`].
///
/// # Errors
///
/// Returns the first I/O error reported by `writer`.
pub fn write_node<W: io::Write>(writer: W, doc: &Document, node: NodeId) -> io::Result<W> {
    print(IoSink::new(writer), doc, node, &PrintOptions::default()).map(IoSink::into_inner)
}

/// Serializes a whole document to a string with default options.
///
/// # Examples
///
/// ```
/// use xmlprint::Document;
/// use xmlprint::serial::serialize;
///
/// let doc = Document::parse_str("<note>hi</note>").unwrap();
/// assert_eq!(serialize(&doc), "<note>hi</note>\n");
/// ```
#[must_use]
pub fn serialize(doc: &Document) -> String {
    serialize_with_options(doc, &PrintOptions::default())
}

/// Serializes a whole document to a string with the given options.
#[must_use]
pub fn serialize_with_options(doc: &Document, options: &PrintOptions) -> String {
    into_ok(print(String::new(), doc, doc.root(), options))
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// A node paired with print options, printable with `{}`.
///
/// Returned by [`Document::display`].
#[derive(Debug, Clone, Copy)]
pub struct NodeDisplay<'a> {
    doc: &'a Document,
    node: NodeId,
    options: PrintOptions,
}

impl NodeDisplay<'_> {
    /// Replaces the default print options.
    #[must_use]
    pub fn with_options(mut self, options: PrintOptions) -> Self {
        self.options = options;
        self
    }
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print(FmtSink::new(f), self.doc, self.node, &self.options).map(drop)
    }
}

impl Document {
    /// Returns a [`fmt::Display`] view of `node` using default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlprint::Document;
    ///
    /// let doc = Document::parse_str("<a><b>x</b></a>").unwrap();
    /// let b = doc.first_child(doc.root_element().unwrap()).unwrap();
    /// assert_eq!(doc.display(b).to_string(), "<b>x</b>\n");
    /// ```
    #[must_use]
    pub fn display(&self, node: NodeId) -> NodeDisplay<'_> {
        NodeDisplay {
            doc: self,
            node,
            options: PrintOptions::default(),
        }
    }
}

/// Prints the whole document with default options.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(self.root()), f)
    }
}

struct Printer<'a, S> {
    doc: &'a Document,
    options: &'a PrintOptions,
    out: S,
}

impl<S: Sink> Printer<'_, S> {
    fn print_node(&mut self, id: NodeId, depth: usize) -> Result<(), S::Error> {
        let doc = self.doc;
        match &doc.node(id).kind {
            // Transparent root: its children carry their own line breaks.
            NodeKind::Document => return self.print_children(id, depth),
            NodeKind::Element {
                name,
                value,
                attributes,
            } => self.print_element(id, name, value, attributes, depth)?,
            NodeKind::Data { value } => {
                self.indent(depth)?;
                copy_and_expand_chars(&mut self.out, value)?;
            }
            NodeKind::CData { value } => {
                self.indent(depth)?;
                self.out.put_str("<![CDATA[")?;
                copy_chars(&mut self.out, value)?;
                self.out.put_str("]]>")?;
            }
            NodeKind::Declaration { attributes } => {
                self.indent(depth)?;
                self.out.put_str("<?xml")?;
                self.print_attributes(attributes)?;
                self.out.put_str("?>")?;
            }
            NodeKind::Comment { value } => {
                self.indent(depth)?;
                self.out.put_str("<!--")?;
                copy_chars(&mut self.out, value)?;
                self.out.put_str("-->")?;
            }
            NodeKind::Doctype { value } => {
                self.indent(depth)?;
                self.out.put_str("<!DOCTYPE ")?;
                copy_chars(&mut self.out, value)?;
                self.out.put('>')?;
            }
            NodeKind::ProcessingInstruction { name, value } => {
                self.indent(depth)?;
                self.out.put_str("<?")?;
                copy_chars(&mut self.out, name)?;
                self.out.put(' ')?;
                copy_chars(&mut self.out, value)?;
                self.out.put_str("?>")?;
            }
        }

        if self.options.indenting() {
            self.out.put('\n')?;
        }
        Ok(())
    }

    fn print_children(&mut self, id: NodeId, depth: usize) -> Result<(), S::Error> {
        for child in self.doc.children(id) {
            self.print_node(child, depth)?;
        }
        Ok(())
    }

    fn print_element(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
        attributes: &[Attribute],
        depth: usize,
    ) -> Result<(), S::Error> {
        let doc = self.doc;

        self.indent(depth)?;
        self.out.put('<')?;
        copy_chars(&mut self.out, name)?;
        self.print_attributes(attributes)?;

        let first = doc.first_child(id);
        if value.is_empty() && first.is_none() {
            return self.out.put_str("/>");
        }
        self.out.put('>')?;

        let sole_text = first
            .filter(|&child| doc.next_sibling(child).is_none())
            .and_then(|child| match &doc.node(child).kind {
                NodeKind::Data { value } => Some(value.as_str()),
                _ => None,
            });

        match (first, sole_text) {
            (None, _) => copy_and_expand_chars(&mut self.out, value)?,
            (Some(_), Some(text)) => copy_and_expand_chars(&mut self.out, text)?,
            (Some(_), None) => {
                if self.options.indenting() {
                    self.out.put('\n')?;
                }
                self.print_children(id, depth + 1)?;
                self.indent(depth)?;
            }
        }

        self.out.put_str("</")?;
        copy_chars(&mut self.out, name)?;
        self.out.put('>')
    }

    fn print_attributes(&mut self, attributes: &[Attribute]) -> Result<(), S::Error> {
        for attr in attributes {
            let (Some(name), Some(value)) = (attr.name.as_deref(), attr.value.as_deref()) else {
                trace!("skipping attribute without name or value: {attr:?}");
                continue;
            };
            if name.is_empty() {
                trace!("skipping attribute with empty name");
                continue;
            }
            self.out.put(' ')?;
            copy_chars(&mut self.out, name)?;
            self.out.put_str("=\"")?;
            copy_and_expand_chars(&mut self.out, value)?;
            self.out.put('"')?;
        }
        Ok(())
    }

    fn indent(&mut self, depth: usize) -> Result<(), S::Error> {
        if self.options.indenting() {
            fill_chars(&mut self.out, depth, self.options.indent_char)?;
        }
        Ok(())
    }
}
