//! Node type definitions.
//!
//! The `NodeKind` enum is the closed set of node shapes the printer knows
//! how to emit. Each variant carries its own payload; navigation links
//! (parent, children, siblings) live in `NodeData`.

use super::Attribute;

/// The kind of a node and its associated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. It has children but no markup of its own.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The element's tag name, copied to the output as-is.
        name: String,
        /// Character data attached directly to the element. Printed only when
        /// the element has no children.
        value: String,
        /// Attributes on this element, in document order.
        attributes: Vec<Attribute>,
    },

    /// A text node. Its value is escaped on output.
    Data {
        /// The text content (entity references already decoded).
        value: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`.
    CData {
        /// The section body (no escaping applied).
        value: String,
    },

    /// An XML declaration, e.g., `<?xml version="1.0"?>`.
    Declaration {
        /// The pseudo-attributes (`version`, `encoding`, `standalone`, ...).
        attributes: Vec<Attribute>,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        value: String,
    },

    /// A document type declaration, e.g., `<!DOCTYPE html>`.
    Doctype {
        /// Everything between `<!DOCTYPE ` and the closing `>`, verbatim.
        value: String,
    },

    /// A processing instruction, e.g., `<?target data?>`.
    ProcessingInstruction {
        /// The PI target (e.g., `"xml-stylesheet"`).
        name: String,
        /// The PI data.
        value: String,
    },
}

impl NodeKind {
    /// Creates an element with no value and no attributes.
    #[must_use]
    pub fn element(name: impl Into<String>) -> Self {
        Self::Element {
            name: name.into(),
            value: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Creates a text node.
    #[must_use]
    pub fn data(value: impl Into<String>) -> Self {
        Self::Data {
            value: value.into(),
        }
    }

    /// Returns `true` for the kinds that may own children.
    #[must_use]
    pub fn can_have_children(&self) -> bool {
        matches!(self, Self::Document | Self::Element { .. })
    }
}
