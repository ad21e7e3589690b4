//! Delimited "Str" Records
//!
//! A compact record format: scalar or string tokens joined by one separator
//! character, with no escaping. It is used on its own for plain aggregates and
//! inside XML for multi-valued attributes such as comma-joined lists.

mod class;
mod reader;
mod scalar;
mod span_str;
mod writer;


pub use class::{group_emitted, group_read, last_needed_group, StrClass, StrField};
pub use reader::StrReader;
pub use scalar::{
    interpret_bool, BaseStrParser, InvariantFormatter, Parsable, StandardStrParser, StrFormatter,
    StrParser,
};
pub use span_str::SpanStr;
pub use writer::StrWriter;
