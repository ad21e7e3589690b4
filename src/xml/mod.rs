//! XML Reader and Writer
//!
//! A restricted XML subset read and written without a tree: nodes with
//! attributes and a body that is empty, a single text block, or a sequence of
//! child nodes. Declarations and comments are skipped. DOCTYPE is rejected.

mod params;
mod read;
mod serializable;
mod write;

#[cfg(test)]
mod tests;

pub use params::{CDataMode, XmlReadParams, XmlWriteParams};
pub use read::XmlReadBuffer;
pub use serializable::{SubBody, XmlSerializable};
pub use write::{NodeRecord, XmlWriteBuffer};

/// Opening marker of a CDATA block
pub const CDATA_START: &str = "<![CDATA[";
/// Closing marker of a CDATA block
pub const CDATA_END: &str = "]]>";
