//! Error types for document construction.
//!
//! Printing has no error type of its own: a print call fails only when its
//! sink fails, and that error is handed back unchanged (see
//! [`Sink::Error`](crate::serial::Sink::Error)). Parsing reports a
//! [`ParseError`] carrying the source location of the first fatal problem.

use std::fmt;

use thiserror::Error;

/// Source location within an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The error type returned when the input cannot be turned into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {location}: {message}")]
pub struct ParseError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Where in the source the error occurred.
    pub location: SourceLocation,
}
