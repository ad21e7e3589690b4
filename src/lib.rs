//! StackXML - allocation-minimizing serialization over borrowed text
//!
//! Formats:
//! XML: recursive descent reader and writer driven by [`XmlSerializable`] visitors
//! Str: flat separator-delimited records ([`StrReader`], [`StrWriter`], [`StrClass`])
//!
//! Both read straight from the caller's `&str` and hand out [`SpanStr`] views
//! instead of building a tree.

mod core;
pub mod delimited;
mod error;
pub mod xml;

pub use delimited::{SpanStr, StrClass, StrReader, StrWriter};
pub use error::{Error, Result};
pub use xml::{CDataMode, SubBody, XmlReadBuffer, XmlSerializable, XmlWriteBuffer};
