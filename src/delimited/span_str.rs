//! Borrowed-or-owned string view
//!
//! `SpanStr` is what readers hand out for text: a view straight into the
//! input when nothing had to be decoded, an owned string otherwise.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// A string that either borrows from the parsed input or owns decoded text.
///
/// Equality compares characters, never identity. `SpanStr` intentionally
/// implements neither `Hash` nor `Borrow<str>`: a borrowed view must not be
/// used as a map key that outlives the buffer it points into. Call
/// [`SpanStr::into_owned`] to keep the text.
#[derive(Clone)]
pub enum SpanStr<'a> {
    /// View into the caller's buffer
    Borrowed(&'a str),
    /// Text that had to be copied (e.g. after entity decoding)
    Owned(String),
}

impl<'a> SpanStr<'a> {
    /// Create a borrowed view
    #[inline]
    pub const fn new(data: &'a str) -> Self {
        SpanStr::Borrowed(data)
    }

    /// Get the text
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            SpanStr::Borrowed(s) => s,
            SpanStr::Owned(s) => s,
        }
    }

    /// Check if this is a view into the input
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, SpanStr::Borrowed(_))
    }

    /// Check whether `c` occurs in the text
    #[inline]
    pub fn contains_char(&self, c: char) -> bool {
        self.as_str().contains(c)
    }

    /// Copy into an owned string (no copy if already owned)
    pub fn into_owned(self) -> String {
        match self {
            SpanStr::Borrowed(s) => s.to_owned(),
            SpanStr::Owned(s) => s,
        }
    }
}

impl Default for SpanStr<'_> {
    fn default() -> Self {
        SpanStr::Borrowed("")
    }
}

impl Deref for SpanStr<'_> {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for SpanStr<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for SpanStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for SpanStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> From<&'a str> for SpanStr<'a> {
    fn from(s: &'a str) -> Self {
        SpanStr::Borrowed(s)
    }
}

impl From<String> for SpanStr<'_> {
    fn from(s: String) -> Self {
        SpanStr::Owned(s)
    }
}

impl<'a> From<Cow<'a, str>> for SpanStr<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        match s {
            Cow::Borrowed(s) => SpanStr::Borrowed(s),
            Cow::Owned(s) => SpanStr::Owned(s),
        }
    }
}

impl PartialEq for SpanStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for SpanStr<'_> {}

impl PartialEq<str> for SpanStr<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SpanStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<String> for SpanStr<'_> {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<SpanStr<'_>> for str {
    fn eq(&self, other: &SpanStr<'_>) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<SpanStr<'_>> for &str {
    fn eq(&self, other: &SpanStr<'_>) -> bool {
        *self == other.as_str()
    }
}
