//! Output sinks.
//!
//! A [`Sink`] accepts output one code unit at a time. The printer is generic
//! over it, so the same traversal writes into an in-memory buffer, a
//! `fmt::Formatter`, or any `io::Write` (file, socket, pipe).

use std::convert::Infallible;
use std::fmt;
use std::io;

/// Destination for printed markup.
///
/// Only [`put`](Sink::put) is required. [`put_str`](Sink::put_str) exists so
/// buffers can copy whole runs at once; its default forwards unit by unit.
pub trait Sink {
    /// The failure type of the underlying destination. In-memory sinks use
    /// [`Infallible`].
    type Error;

    /// Appends a single code unit.
    ///
    /// # Errors
    ///
    /// Returns the destination's error if the write is rejected.
    fn put(&mut self, unit: char) -> Result<(), Self::Error>;

    /// Appends a run of code units.
    ///
    /// # Errors
    ///
    /// Returns the destination's error if the write is rejected. Units
    /// before the failing one may already have been written.
    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for unit in s.chars() {
            self.put(unit)?;
        }
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    type Error = S::Error;

    #[inline]
    fn put(&mut self, unit: char) -> Result<(), Self::Error> {
        (**self).put(unit)
    }

    #[inline]
    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        (**self).put_str(s)
    }
}

impl Sink for String {
    type Error = Infallible;

    #[inline]
    fn put(&mut self, unit: char) -> Result<(), Self::Error> {
        self.push(unit);
        Ok(())
    }

    #[inline]
    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.push_str(s);
        Ok(())
    }
}

/// Byte buffers receive the UTF-8 encoding of each unit.
impl Sink for Vec<u8> {
    type Error = Infallible;

    #[inline]
    fn put(&mut self, unit: char) -> Result<(), Self::Error> {
        let mut buf = [0u8; 4];
        self.extend_from_slice(unit.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    #[inline]
    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Adapts any [`fmt::Write`] (including `fmt::Formatter`) into a [`Sink`].
#[derive(Debug)]
pub struct FmtSink<W> {
    inner: W,
}

impl<W: fmt::Write> FmtSink<W> {
    /// Wraps a formatter-style writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: fmt::Write> Sink for FmtSink<W> {
    type Error = fmt::Error;

    fn put(&mut self, unit: char) -> Result<(), Self::Error> {
        self.inner.write_char(unit)
    }

    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.inner.write_str(s)
    }
}

/// Adapts any [`io::Write`] into a [`Sink`], UTF-8 encoding each unit.
///
/// Every unit is handed straight to the writer, so wrap unbuffered handles
/// (files, sockets) in an [`io::BufWriter`] first.
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: io::Write> IoSink<W> {
    /// Wraps a byte writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    type Error = io::Error;

    fn put(&mut self, unit: char) -> Result<(), Self::Error> {
        let mut buf = [0u8; 4];
        self.inner.write_all(unit.encode_utf8(&mut buf).as_bytes())
    }

    fn put_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.inner.write_all(s.as_bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Accepts a fixed number of units, then fails every write.
    struct Limited {
        written: String,
        remaining: usize,
    }

    impl Sink for Limited {
        type Error = &'static str;

        fn put(&mut self, unit: char) -> Result<(), Self::Error> {
            if self.remaining == 0 {
                return Err("sink full");
            }
            self.remaining -= 1;
            self.written.push(unit);
            Ok(())
        }
    }

    #[test]
    fn test_string_sink() {
        let mut out = String::new();
        out.put('<').unwrap();
        out.put_str("a/>").unwrap();
        assert_eq!(out, "<a/>");
    }

    #[test]
    fn test_vec_sink_encodes_utf8() {
        let mut out: Vec<u8> = Vec::new();
        out.put('é').unwrap();
        out.put_str("x").unwrap();
        assert_eq!(out, "éx".as_bytes());
    }

    fn write_abc<S: Sink>(mut sink: S) -> Result<S, S::Error> {
        sink.put_str("ab")?;
        sink.put('c')?;
        Ok(sink)
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut buf = String::new();
        write_abc(&mut buf).unwrap();
        write_abc(&mut buf).unwrap();
        assert_eq!(buf, "abcabc");
    }

    #[test]
    fn test_fmt_sink() {
        let mut sink = FmtSink::new(String::new());
        sink.put_str("<?").unwrap();
        sink.put('?').unwrap();
        assert_eq!(sink.into_inner(), "<??");
    }

    #[test]
    fn test_io_sink() {
        let mut sink = IoSink::new(Vec::<u8>::new());
        sink.put_str("ü").unwrap();
        sink.put('>').unwrap();
        assert_eq!(sink.into_inner(), "ü>".as_bytes());
    }

    #[test]
    fn test_default_put_str_stops_at_first_failure() {
        let mut sink = Limited {
            written: String::new(),
            remaining: 2,
        };
        assert_eq!(sink.put_str("abcd"), Err("sink full"));
        assert_eq!(sink.written, "ab");
    }
}
