//! Delimited Record Writer
//!
//! Joins tokens with a single separator character. There is no escaping, so
//! tokens must not contain the separator themselves.

use std::fmt;

use super::scalar::{InvariantFormatter, StrFormatter};
use super::span_str::SpanStr;
use crate::core::pool::PooledBuffer;
use crate::error::Result;

/// Initial buffer capacity for Str writers
const INITIAL_CAPACITY: usize = 256;

/// Writer for a flat, separator-delimited sequence of tokens
pub struct StrWriter {
    buffer: PooledBuffer,
    formatter: &'static dyn StrFormatter,
    separator: char,
    /// Emit one more separator when finishing
    pub separator_at_end: bool,
    is_first: bool,
}

impl StrWriter {
    /// Create a writer using the invariant formatter
    pub fn new(separator: char) -> Self {
        Self::with_formatter(separator, &InvariantFormatter)
    }

    /// Create a writer with a custom scalar formatter
    pub fn with_formatter(separator: char, formatter: &'static dyn StrFormatter) -> Self {
        StrWriter {
            buffer: PooledBuffer::rent(INITIAL_CAPACITY),
            formatter,
            separator,
            separator_at_end: false,
            is_first: true,
        }
    }

    /// Separator between tokens
    pub fn separator(&self) -> char {
        self.separator
    }

    fn put_separator(&mut self) {
        if self.is_first {
            self.is_first = false;
        } else {
            self.buffer.put_char(self.separator);
        }
    }

    /// Append a string token
    pub fn put_str(&mut self, s: &str) {
        self.put_separator();
        self.buffer.put_str(s);
    }

    pub fn put_span_str(&mut self, s: &SpanStr<'_>) {
        self.put_str(s.as_str());
    }

    /// Append a formatted scalar token
    pub fn put<T: fmt::Display + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.put_separator();
        self.buffer.put_formatted(self.formatter, &value)
    }

    /// Append a character without a separator
    pub fn put_raw_char(&mut self, c: char) {
        self.buffer.put_char(c);
    }

    /// Append text without a separator
    pub fn put_raw_str(&mut self, s: &str) {
        self.buffer.put_str(s);
    }

    /// Everything written so far, without the finishing touches
    pub fn built(&self) -> &str {
        self.buffer.as_str()
    }

    /// Check if no token was written
    pub fn is_empty(&self) -> bool {
        self.is_first
    }

    /// Finish the record and release the writer
    ///
    /// Appends the trailing separator if requested and, with `terminate`, a
    /// NUL terminator.
    pub fn finish(mut self, terminate: bool) -> String {
        if self.separator_at_end {
            self.buffer.put_char(self.separator);
        }
        if terminate {
            self.buffer.put_char('\0');
        }
        self.buffer.into_string()
    }

    /// Finish the record without a terminator
    pub fn into_string(self) -> String {
        self.finish(false)
    }
}

impl fmt::Debug for StrWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrWriter")
            .field("separator", &self.separator)
            .field("built", &self.built())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_tokens() {
        let mut writer = StrWriter::new(' ');
        writer.put_str("hello");
        writer.put_str("world");
        writer.put(&5.6).unwrap();
        writer.put(&255).unwrap();
        assert_eq!(writer.into_string(), "hello world 5.6 255");
    }

    #[test]
    fn test_no_leading_separator() {
        let mut writer = StrWriter::new(',');
        assert!(writer.is_empty());
        writer.put(&1u8).unwrap();
        assert_eq!(writer.built(), "1");
        writer.put_raw_char('x');
        writer.put_str("");
        assert_eq!(writer.built(), "1x,");
    }

    #[test]
    fn test_finish() {
        let mut writer = StrWriter::new('/');
        writer.separator_at_end = true;
        writer.put_str("a");
        writer.put_str("b");
        assert_eq!(writer.finish(true), "a/b/\0");
    }

    #[test]
    fn test_long_record_grows() {
        let mut writer = StrWriter::new(',');
        for i in 0..1000 {
            writer.put(&i).unwrap();
        }
        let built = writer.into_string();
        assert!(built.starts_with("0,1,2,"));
        assert!(built.ends_with(",998,999"));
    }
}
