//! Visitor Contract
//!
//! Types read from and written to XML implement [`XmlSerializable`]. The
//! engine drives the callbacks; each one defaults to "not handled" so an
//! implementation only covers what it adds. Shared fields are handled by
//! composing a base value and delegating to it first:
//!
//! ```
//! use stackxml::xml::{SubBody, XmlReadBuffer, XmlSerializable};
//! use stackxml::{Result, SpanStr};
//!
//! #[derive(Default)]
//! struct Entity {
//!     id: u32,
//! }
//!
//! impl<'a> XmlSerializable<'a> for Entity {
//!     fn node_name(&self) -> &str {
//!         "entity"
//!     }
//!
//!     fn parse_attribute(
//!         &mut self,
//!         buffer: &mut XmlReadBuffer,
//!         name: &'a str,
//!         value: SpanStr<'a>,
//!     ) -> Result<bool> {
//!         match name {
//!             "id" => self.id = buffer.parse(&value)?,
//!             _ => return Ok(false),
//!         }
//!         Ok(true)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Player {
//!     base: Entity,
//!     name: String,
//! }
//!
//! impl<'a> XmlSerializable<'a> for Player {
//!     fn node_name(&self) -> &str {
//!         "player"
//!     }
//!
//!     fn parse_attribute(
//!         &mut self,
//!         buffer: &mut XmlReadBuffer,
//!         name: &'a str,
//!         value: SpanStr<'a>,
//!     ) -> Result<bool> {
//!         self.base.parse_attribute(buffer, name, value)
//!     }
//!
//!     fn parse_sub_body(
//!         &mut self,
//!         buffer: &mut XmlReadBuffer,
//!         name: &'a str,
//!         outer: &'a str,
//!         inner: &'a str,
//!     ) -> Result<SubBody> {
//!         match name {
//!             "name" => {
//!                 let (text, end) = buffer.deserialize_cdata(inner)?;
//!                 self.name = text.into_owned();
//!                 Ok(SubBody::EndInner(end))
//!             }
//!             _ => self.base.parse_sub_body(buffer, name, outer, inner),
//!         }
//!     }
//! }
//!
//! let input = "<player id='7'><name><![CDATA[tim]]></name></player>";
//! let player: Player = XmlReadBuffer::read_static(input, Default::default()).unwrap();
//! assert_eq!(player.base.id, 7);
//! assert_eq!(player.name, "tim");
//! ```

use super::read::XmlReadBuffer;
use super::write::XmlWriteBuffer;
use crate::delimited::SpanStr;
use crate::error::Result;

/// How far a [`XmlSerializable::parse_sub_body`] callback consumed its child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubBody {
    /// The child name is unknown to this type
    Unhandled,
    /// Offset into the outer span just past the child's closing tag
    End(usize),
    /// Offset into the inner span where the child's text ends
    ///
    /// The parser skips the `</name>` that follows by itself.
    EndInner(usize),
}

/// A type that maps XML nodes onto its fields.
///
/// `'a` is the lifetime of the parsed text, so fields may borrow from it.
pub trait XmlSerializable<'a> {
    /// Name of the node this type is written as
    fn node_name(&self) -> &str;

    /// Handle one attribute, returning `false` if the name is unknown
    ///
    /// `value` is already entity decoded.
    fn parse_attribute(
        &mut self,
        _buffer: &mut XmlReadBuffer,
        _name: &'a str,
        _value: SpanStr<'a>,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Claim the whole body as text
    ///
    /// `body` starts right after the node head. Returns the offset in `body`
    /// where the text ends; the closing tag must follow immediately.
    fn parse_full_body(
        &mut self,
        _buffer: &mut XmlReadBuffer,
        _body: &'a str,
    ) -> Result<Option<usize>> {
        Ok(None)
    }

    /// Handle one child node
    ///
    /// `outer` starts at the child's `<`, `inner` right after its head (empty
    /// for a self-closing child).
    fn parse_sub_body(
        &mut self,
        _buffer: &mut XmlReadBuffer,
        _name: &'a str,
        _outer: &'a str,
        _inner: &'a str,
    ) -> Result<SubBody> {
        Ok(SubBody::Unhandled)
    }

    fn serialize_attributes(&self, _buffer: &mut XmlWriteBuffer) -> Result<()> {
        Ok(())
    }

    fn serialize_body(&self, _buffer: &mut XmlWriteBuffer) -> Result<()> {
        Ok(())
    }
}
