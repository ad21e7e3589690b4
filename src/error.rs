//! Error handling types.
//!
//! Reading and writing share one error type. Aborting a parse is not an
//! error and never shows up here.

use std::borrow::Cow;
use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, Error>;

/// Potential errors to encounter while reading or writing XML or Str records.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input is malformed or does not match the target type.
    #[error("invalid data: {0}")]
    DataFormat(Cow<'static, str>),
    /// The input nests deeper than the configured maximum depth.
    #[error("maximum depth {max_depth} reached")]
    RecursionLimitExceeded { max_depth: usize },
    /// The input uses a construct this engine does not handle, like a DOCTYPE.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(&'static str),
    /// The caller handed over something that can't be serialized.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Raised by a visitor callback and passed through unchanged.
    #[error(transparent)]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Shorthand for [`Error::DataFormat`].
    pub fn data_format(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::DataFormat(msg.into())
    }

    /// Wraps an error raised by a visitor callback.
    pub fn custom(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Custom(err.into())
    }

    /// True for [`Error::DataFormat`].
    pub fn is_data_format(&self) -> bool {
        matches!(self, Self::DataFormat(_))
    }
}
