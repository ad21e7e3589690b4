//! XML Writer
//!
//! Appends nodes straight into a pooled buffer. A node head stays open after
//! `<name` so attributes can follow; the first body write or the end of the
//! node closes it with `>` or `/>`.

use std::fmt;

use super::params::{CDataMode, XmlWriteParams};
use super::serializable::XmlSerializable;
use super::{CDATA_END, CDATA_START};
use crate::core::entities::{escape_byte, find_escape};
use crate::core::pool::PooledBuffer;
use crate::delimited::StrWriter;
use crate::error::{Error, Result};

/// Initial buffer capacity for XML writers
const INITIAL_CAPACITY: usize = 1024;
/// Scratch capacity for one formatted scalar
const FORMAT_CAPACITY: usize = 64;

/// Handle for an open node, consumed by [`XmlWriteBuffer::end_node`]
#[derive(Debug)]
#[must_use = "a started node must be ended"]
pub struct NodeRecord<'n> {
    name: &'n str,
}

impl NodeRecord<'_> {
    pub fn name(&self) -> &str {
        self.name
    }
}

/// Serialize context owning the output buffer
pub struct XmlWriteBuffer {
    buffer: PooledBuffer,
    pending_head: bool,
    params: XmlWriteParams,
}

impl XmlWriteBuffer {
    pub fn new() -> Self {
        Self::with_params(XmlWriteParams::default())
    }

    pub fn with_params(params: XmlWriteParams) -> Self {
        XmlWriteBuffer {
            buffer: PooledBuffer::rent(INITIAL_CAPACITY),
            pending_head: false,
            params,
        }
    }

    /// Serialize `obj` as a complete document
    pub fn serialize_static<'o, T>(obj: &T, cdata_mode: CDataMode) -> Result<String>
    where
        T: XmlSerializable<'o> + ?Sized,
    {
        if obj.node_name().is_empty() {
            return Err(Error::InvalidArgument("top-level node has no name"));
        }
        let mut writer = Self::with_params(XmlWriteParams {
            cdata_mode,
            ..XmlWriteParams::default()
        });
        writer.put_object(obj)?;
        Ok(writer.into_string())
    }

    #[inline]
    pub fn params(&self) -> &XmlWriteParams {
        &self.params
    }

    /// Write `<name`, closing any pending head first
    pub fn start_node_head<'n>(&mut self, name: &'n str) -> NodeRecord<'n> {
        self.end_node_head();
        self.buffer.put_char('<');
        self.buffer.put_str(name);
        self.pending_head = true;
        NodeRecord { name }
    }

    /// Close a pending head with `>`
    ///
    /// Needed before raw body writes; the body helpers do this themselves.
    pub fn end_node_head(&mut self) {
        if self.pending_head {
            self.buffer.put_char('>');
            self.pending_head = false;
        }
    }

    /// Close the node, as `/>` if nothing was written into it
    pub fn end_node(&mut self, record: NodeRecord<'_>) {
        if self.pending_head {
            self.buffer.put_str("/>");
            self.pending_head = false;
        } else {
            self.buffer.put_str("</");
            self.buffer.put_str(record.name);
            self.buffer.put_char('>');
        }
    }

    fn start_attribute(&mut self, name: &str) {
        debug_assert!(self.pending_head, "attribute {name} written outside of a node head");
        self.buffer.put_char(' ');
        self.buffer.put_str(name);
        self.buffer.put_str("='");
    }

    fn end_attribute(&mut self) {
        self.buffer.put_char('\'');
    }

    /// Write a text attribute, escaped
    pub fn put_attribute(&mut self, name: &str, value: &str) {
        self.start_attribute(name);
        self.encode_text(value, true);
        self.end_attribute();
    }

    /// Write a scalar attribute with the configured formatter, escaped
    pub fn put_attribute_value<T>(&mut self, name: &str, value: &T) -> Result<()>
    where
        T: fmt::Display + ?Sized,
    {
        self.start_attribute(name);
        self.put_formatted_text(&value, true)?;
        self.end_attribute();
        Ok(())
    }

    /// Write a boolean attribute as `1` or `0`
    pub fn put_attribute_bool(&mut self, name: &str, value: bool) {
        self.start_attribute(name);
        self.buffer.put_char(if value { '1' } else { '0' });
        self.end_attribute();
    }

    /// Write a list of values joined by `separator` as one attribute
    pub fn put_attribute_list<I>(&mut self, name: &str, values: I, separator: char) -> Result<()>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let mut joined = StrWriter::with_formatter(separator, self.params.formatter);
        for value in values {
            joined.put(&value)?;
        }
        self.put_attribute(name, joined.built());
        Ok(())
    }

    /// Write element text according to the configured [`CDataMode`]
    pub fn put_cdata(&mut self, text: &str) {
        self.end_node_head();
        match self.params.cdata_mode {
            CDataMode::On => {
                self.buffer.put_str(CDATA_START);
                self.buffer.put_str(text);
                self.buffer.put_str(CDATA_END);
            }
            CDataMode::Off => self.encode_text(text, false),
            CDataMode::OnEncoded => {
                self.buffer.put_str(CDATA_START);
                self.encode_text(text, false);
                self.buffer.put_str(CDATA_END);
            }
        }
    }

    /// Write a primitive body such as the `5` in `<count>5</count>`, escaped
    pub fn put_value<T: fmt::Display + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.end_node_head();
        self.put_formatted_text(&value, false)
    }

    /// Format into a scratch buffer, then append it escaped
    fn put_formatted_text(&mut self, value: &dyn fmt::Display, attribute: bool) -> Result<()> {
        let mut formatted = PooledBuffer::rent(FORMAT_CAPACITY);
        formatted.put_formatted(self.params.formatter, value)?;
        self.encode_text(formatted.as_str(), attribute);
        Ok(())
    }

    /// Write a nested value under its own node name
    pub fn put_object<'o, T>(&mut self, obj: &T) -> Result<()>
    where
        T: XmlSerializable<'o> + ?Sized,
    {
        self.put_object_named(obj.node_name(), obj)
    }

    /// Write a nested value under `name`
    pub fn put_object_named<'o, T>(&mut self, name: &str, obj: &T) -> Result<()>
    where
        T: XmlSerializable<'o> + ?Sized,
    {
        let node = self.start_node_head(name);
        obj.serialize_attributes(self)?;
        obj.serialize_body(self)?;
        self.end_node(node);
        Ok(())
    }

    /// Append raw text
    #[inline]
    pub fn put_str(&mut self, s: &str) {
        self.buffer.put_str(s);
    }

    /// Append a raw character
    #[inline]
    pub fn put_char(&mut self, c: char) {
        self.buffer.put_char(c);
    }

    /// Append `text` with markup characters replaced by entities
    ///
    /// Attribute text also escapes quotes, `\n`, `\r` and `\t`.
    pub fn encode_text(&mut self, text: &str, attribute: bool) {
        let mut rest = text;
        while let Some(idx) = find_escape(rest.as_bytes(), attribute) {
            self.buffer.put_str(&rest[..idx]);
            if let Some(entity) = escape_byte(rest.as_bytes()[idx], attribute) {
                self.buffer.put_str(entity);
            }
            rest = &rest[idx + 1..];
        }
        self.buffer.put_str(rest);
    }

    /// Check if nothing was written yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Everything written so far
    #[inline]
    pub fn as_str(&self) -> &str {
        self.buffer.as_str()
    }

    /// Take the output and release the writer
    pub fn into_string(self) -> String {
        self.buffer.into_string()
    }
}

impl Default for XmlWriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for XmlWriteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlWriteBuffer")
            .field("params", &self.params)
            .field("pending_head", &self.pending_head)
            .field("written", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}
