//! Delimited Record Reader
//!
//! Pulls one token at a time from a borrowed source. Reading past the end
//! yields empty tokens instead of failing, which is what lets short records
//! leave trailing optional fields at their defaults.

use std::fmt;
use std::iter::Peekable;
use std::str::Split;

use super::scalar::{Parsable, StandardStrParser, StrParser};
use super::span_str::SpanStr;
use crate::error::Result;

/// Lazily splitting reader over a separator-delimited source
pub struct StrReader<'a> {
    tokens: Option<Peekable<Split<'a, char>>>,
    parser: &'static dyn StrParser,
}

impl<'a> StrReader<'a> {
    /// Create a reader using [`StandardStrParser`]
    pub fn new(source: &'a str, separator: char) -> Self {
        Self::with_parser(source, separator, &StandardStrParser)
    }

    /// Create a reader with a custom scalar parser
    pub fn with_parser(source: &'a str, separator: char, parser: &'static dyn StrParser) -> Self {
        // an empty source holds no tokens at all, not one empty token
        let tokens = (!source.is_empty()).then(|| source.split(separator).peekable());
        StrReader { tokens, parser }
    }

    /// Check for a remaining token without consuming it
    pub fn has_remaining(&mut self) -> bool {
        self.tokens.as_mut().is_some_and(|t| t.peek().is_some())
    }

    /// Next token, or `""` once the record is exhausted
    pub fn get_str(&mut self) -> &'a str {
        self.tokens.as_mut().and_then(Iterator::next).unwrap_or_default()
    }

    /// Next token as a [`SpanStr`] view
    pub fn get_span_str(&mut self) -> SpanStr<'a> {
        SpanStr::Borrowed(self.get_str())
    }

    /// Parse the next token
    pub fn get<T: Parsable>(&mut self) -> Result<T> {
        let token = self.get_str();
        T::parse_with(token, self.parser)
    }

    /// Drain all remaining tokens
    pub fn read_to_end(&mut self) -> Vec<&'a str> {
        self.tokens.as_mut().map(|t| t.collect()).unwrap_or_default()
    }

    /// Parse all remaining tokens
    pub fn read_all<T: Parsable>(&mut self) -> Result<Vec<T>> {
        let mut values = Vec::new();
        while self.has_remaining() {
            values.push(self.get()?);
        }
        Ok(values)
    }

    /// Parser used for scalar tokens
    pub fn parser(&self) -> &'static dyn StrParser {
        self.parser
    }
}

impl fmt::Debug for StrReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrReader").finish_non_exhaustive()
    }
}
