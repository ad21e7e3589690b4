//! Scalar Formatting and Parsing
//!
//! Pluggable, culture-invariant conversion between tokens and scalar values.
//! Both traits are object safe so parameter structs can hold `&'static dyn`
//! instances.

use std::fmt;

use crate::error::{Error, Result};

/// Formats scalar values into a writer's buffer.
pub trait StrFormatter {
    /// Write `value` to `out`.
    ///
    /// `out` is bounded by the free space of the destination buffer. An error
    /// caused by running out of space makes the caller grow and retry.
    fn try_format(&self, out: &mut dyn fmt::Write, value: &dyn fmt::Display) -> fmt::Result {
        write!(out, "{value}")
    }
}

/// Default formatter: `Display`, which never depends on locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantFormatter;

impl StrFormatter for InvariantFormatter {}

/// Parses tokens into scalar values.
pub trait StrParser {
    /// Interpret a boolean token
    fn parse_bool(&self, text: &str) -> Result<bool> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::data_format(format!("unknown boolean \"{text}\""))),
        }
    }

    /// Whether an empty token parses to the type's default value
    fn empty_as_default(&self) -> bool {
        false
    }
}

/// Strict parser: only Rust's own literal syntax, empty tokens are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseStrParser;

impl StrParser for BaseStrParser {}

/// Lenient parser used by default.
///
/// Empty primitive tokens become the default value and booleans go through
/// [`interpret_bool`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardStrParser;

impl StrParser for StandardStrParser {
    fn parse_bool(&self, text: &str) -> Result<bool> {
        interpret_bool(text)
    }

    fn empty_as_default(&self) -> bool {
        true
    }
}

/// Interpret a boolean token.
///
/// Accepts `0`/`1` and, ignoring ASCII case, `no`/`yes` and `false`/`true`.
pub fn interpret_bool(text: &str) -> Result<bool> {
    match text {
        "0" => return Ok(false),
        "1" => return Ok(true),
        _ => {}
    }
    if text.eq_ignore_ascii_case("no") || text.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    if text.eq_ignore_ascii_case("yes") || text.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    Err(Error::data_format(format!("unknown boolean \"{text}\"")))
}

/// A value that can be parsed from a single token.
pub trait Parsable: Sized {
    fn parse_with(text: &str, parser: &dyn StrParser) -> Result<Self>;
}

macro_rules! impl_parsable_from_str {
    ($($ty:ty),* $(,)?) => {$(
        impl Parsable for $ty {
            fn parse_with(text: &str, parser: &dyn StrParser) -> Result<Self> {
                if text.is_empty() && parser.empty_as_default() {
                    return Ok(<$ty>::default());
                }
                text.parse::<$ty>().map_err(|err| {
                    Error::data_format(format!(
                        concat!("invalid ", stringify!($ty), " \"{}\": {}"),
                        text, err
                    ))
                })
            }
        }
    )*};
}

impl_parsable_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char
);

impl Parsable for bool {
    fn parse_with(text: &str, parser: &dyn StrParser) -> Result<Self> {
        if text.is_empty() && parser.empty_as_default() {
            return Ok(false);
        }
        parser.parse_bool(text)
    }
}

impl Parsable for String {
    fn parse_with(text: &str, _parser: &dyn StrParser) -> Result<Self> {
        Ok(text.to_owned())
    }
}

/// An empty token reads as `None`
impl<T: Parsable> Parsable for Option<T> {
    fn parse_with(text: &str, parser: &dyn StrParser) -> Result<Self> {
        if text.is_empty() {
            return Ok(None);
        }
        T::parse_with(text, parser).map(Some)
    }
}
