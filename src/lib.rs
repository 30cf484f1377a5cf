//! # xmlprint
//!
//! An XML tree printer. Documents live in an arena of typed nodes
//! (elements, text, CDATA, comments, declarations, doctypes and processing
//! instructions) and are written back out as markup, either indented with
//! one unit per nesting level or compact on a single line.
//!
//! Output goes through the [`serial::Sink`] trait, so the same printer fills
//! a `String`, a byte buffer, a `fmt::Formatter` or any `io::Write`.
//!
//! ## Quick Start
//!
//! ```
//! use xmlprint::Document;
//!
//! let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
//! assert_eq!(doc.to_string(), "<root>\n\t<child>Hello</child>\n</root>\n");
//! ```
//!
//! Trees can also be built by hand:
//!
//! ```
//! use xmlprint::{Attribute, Document, NodeKind, PrintOptions};
//! use xmlprint::serial::print;
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let item = doc.create_node(NodeKind::Element {
//!     name: "item".to_string(),
//!     value: "fish & chips".to_string(),
//!     attributes: vec![Attribute::new("id", "1")],
//! });
//! doc.append_child(root, item);
//!
//! let opts = PrintOptions::default().no_indenting(true);
//! let out = print(String::new(), &doc, root, &opts).unwrap();
//! assert_eq!(out, r#"<item id="1">fish &amp; chips</item>"#);
//! ```

pub mod error;
pub mod parser;
pub mod serial;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use serial::PrintOptions;
pub use tree::{Attribute, Document, NodeId, NodeKind};
