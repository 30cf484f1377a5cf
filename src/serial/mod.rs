//! XML serialization.
//!
//! This module prints a `Document` (or any subtree of it) back to markup
//! text. Output goes through the [`Sink`] trait, so the same traversal fills
//! strings, byte buffers, formatters and I/O streams.

pub mod escape;
pub mod sink;
pub mod xml;

pub use sink::{FmtSink, IoSink, Sink};
pub use xml::{
    print, serialize, serialize_with_options, write_node, NodeDisplay, PrintOptions,
};
