//! Recursive Descent XML Reader
//!
//! Parses directly into an [`XmlSerializable`] target without building a
//! token stream or a tree. Each nesting level is one real recursive call to
//! [`XmlReadBuffer::read_into`], guarded by a depth counter.
//!
//! Boundaries are found by plain searches: the first `>` ends a node head and
//! the first matching quote ends an attribute value. Values produced by
//! [`XmlWriteBuffer`](super::XmlWriteBuffer) never contain either unescaped.

use std::any::type_name;

use super::params::{CDataMode, XmlReadParams};
use super::serializable::{SubBody, XmlSerializable};
use super::{CDATA_END, CDATA_START};
use crate::core::entities::decode_text;
use crate::core::scanner::{
    find_byte, find_name_end, find_seq, find_tag_end, find_tag_start, skip_whitespace, trim_end,
};
use crate::delimited::{Parsable, SpanStr, StrReader};
use crate::error::{Error, Result};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const DECLARATION_END: &str = "?>";

/// Parse context for one top-level read
#[derive(Debug, Default)]
pub struct XmlReadBuffer {
    params: XmlReadParams,
    depth: usize,
    aborted: bool,
}

impl XmlReadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: XmlReadParams) -> Self {
        XmlReadBuffer {
            params,
            depth: 0,
            aborted: false,
        }
    }

    /// Parse into a new `T` without setting up a buffer
    pub fn read_static<'a, T>(span: &'a str, cdata_mode: CDataMode) -> Result<T>
    where
        T: XmlSerializable<'a> + Default,
    {
        let mut buffer = Self::with_params(XmlReadParams {
            cdata_mode,
            ..XmlReadParams::default()
        });
        buffer.read(span)
    }

    /// Parse the first node of `span` into a new `T`
    pub fn read<'a, T>(&mut self, span: &'a str) -> Result<T>
    where
        T: XmlSerializable<'a> + Default,
    {
        self.read_with_end(span).map(|(obj, _)| obj)
    }

    /// Like [`read`](Self::read), also returning the offset where the node ended
    pub fn read_with_end<'a, T>(&mut self, span: &'a str) -> Result<(T, usize)>
    where
        T: XmlSerializable<'a> + Default,
    {
        let mut obj = T::default();
        let end = self.read_into(span, &mut obj)?;
        Ok((obj, end))
    }

    /// Parse the first node of `span` into an existing target
    ///
    /// Returns the offset just past the node. After an abort the whole span
    /// counts as consumed.
    pub fn read_into<'a, T>(&mut self, span: &'a str, obj: &mut T) -> Result<usize>
    where
        T: XmlSerializable<'a> + ?Sized,
    {
        if self.aborted {
            return Ok(span.len());
        }

        self.depth += 1;
        let result = if self.depth >= self.params.max_depth {
            Err(Error::RecursionLimitExceeded {
                max_depth: self.params.max_depth,
            })
        } else {
            self.read_node(span, obj)
        };
        self.depth -= 1;
        result
    }

    fn read_node<'a, T>(&mut self, span: &'a str, obj: &mut T) -> Result<usize>
    where
        T: XmlSerializable<'a> + ?Sized,
    {
        let bytes = span.as_bytes();
        let mut primary = true;
        let mut i = 0;

        while i < bytes.len() {
            // text between nodes is either whitespace or was consumed by a body handler
            let Some(tag_start) = find_tag_start(&bytes[i..]) else {
                break;
            };
            i += tag_start;

            let curr = &span[i..];
            let curr_bytes = curr.as_bytes();

            match curr_bytes.get(1) {
                Some(b'/') => {
                    // closing tag of the node being read
                    let close = find_tag_end(curr_bytes)
                        .ok_or_else(|| Error::data_format("unable to find end of closing tag"))?;
                    return Ok(i + close + 1);
                }
                Some(b'?') => {
                    let end = find_seq(curr_bytes, DECLARATION_END.as_bytes())
                        .ok_or_else(|| Error::data_format("unable to find end of declaration"))?;
                    log::trace!("skipping declaration {:?}", &curr[..end + DECLARATION_END.len()]);
                    i += end + DECLARATION_END.len();
                    continue;
                }
                Some(b'!') => {
                    if !curr.starts_with(COMMENT_START) {
                        return Err(Error::UnsupportedConstruct("document type definitions"));
                    }
                    let end = find_seq(&curr_bytes[COMMENT_START.len()..], COMMENT_END.as_bytes())
                        .ok_or_else(|| Error::data_format("unable to find end of comment"))?;
                    log::trace!("skipping comment");
                    i += COMMENT_START.len() + end + COMMENT_END.len();
                    continue;
                }
                _ => {}
            }

            let close = find_tag_end(curr_bytes)
                .ok_or_else(|| Error::data_format("unable to find end of node head"))?;
            let head = &curr[..close];
            let self_closing = head.ends_with('/');
            let name_end = find_name_end(head.as_bytes());
            let name = &head[1..name_end];
            if name.is_empty() {
                return Err(Error::data_format("node without a name"));
            }

            if primary {
                let attrs_end = if self_closing { close - 1 } else { close };
                self.parse_attributes(&head[name_end..attrs_end], obj)?;
                if self.aborted {
                    return Ok(span.len());
                }
                if self_closing {
                    return Ok(i + close + 1);
                }
                primary = false;

                let body = &curr[close + 1..];
                let full_body = obj.parse_full_body(self, body)?;
                if self.aborted {
                    return Ok(span.len());
                }
                if let Some(end) = full_body {
                    let closing = body
                        .get(end..)
                        .and_then(|rest| closing_tag_len(rest, name))
                        .ok_or_else(|| {
                            Error::data_format("unexpected data after handling full body")
                        })?;
                    return Ok(i + close + 1 + end + closing);
                }

                i += close + 1;
                continue;
            }

            let inner = if self_closing { "" } else { &curr[close + 1..] };
            let sub_body = obj.parse_sub_body(self, name, curr, inner)?;
            if self.aborted {
                return Ok(span.len());
            }
            match sub_body {
                SubBody::Unhandled => {
                    return Err(Error::data_format(format!(
                        "unknown sub body {name} on {}",
                        type_name::<T>()
                    )));
                }
                SubBody::End(0) => {
                    return Err(Error::data_format(format!("sub body {name} consumed no input")));
                }
                SubBody::End(end) => i += end,
                SubBody::EndInner(_) if self_closing => i += close + 1,
                // skip the inner text and "</name>"
                SubBody::EndInner(end) => i += close + 1 + end + 3 + name.len(),
            }
        }

        Ok(span.len())
    }

    /// Feed every attribute of a node head to `obj`
    ///
    /// `attrs` is the head between the node name and its closing `>` or `/>`.
    fn parse_attributes<'a, T>(&mut self, attrs: &'a str, obj: &mut T) -> Result<()>
    where
        T: XmlSerializable<'a> + ?Sized,
    {
        let bytes = attrs.as_bytes();
        let mut pos = 0;

        loop {
            pos = skip_whitespace(bytes, pos);
            if pos >= bytes.len() {
                return Ok(());
            }

            let eq = find_byte(&bytes[pos..], b'=')
                .ok_or_else(|| Error::data_format("unexpected data after attributes"))?;
            // an empty name would otherwise trim back over the whitespace already skipped
            let name_end = trim_end(bytes, pos + eq).max(pos);
            let name = &attrs[pos..name_end];
            if name.is_empty() {
                return Err(Error::data_format("attribute without a name"));
            }

            let quote_idx = skip_whitespace(bytes, pos + eq + 1);
            let quote = match bytes.get(quote_idx) {
                Some(&q @ (b'\'' | b'"')) => q,
                Some(_) => {
                    let found = attrs[quote_idx..].chars().next().unwrap_or_default();
                    return Err(Error::data_format(format!("invalid quote char {found:?}")));
                }
                None => return Err(Error::data_format("attribute without a value")),
            };

            let value_start = quote_idx + 1;
            let value_len = find_byte(&bytes[value_start..], quote)
                .ok_or_else(|| Error::data_format("unable to find pair end quote"))?;
            let raw = &attrs[value_start..value_start + value_len];

            let handled = obj.parse_attribute(self, name, decode_text(raw))?;
            if self.aborted {
                return Ok(());
            }
            if !handled {
                log::warn!("unhandled attribute {name} on {}: {raw:?}", type_name::<T>());
            }

            pos = value_start + value_len + 1;
        }
    }

    /// Extract the text at the start of an element body
    ///
    /// Accepts a CDATA block or plain text up to the next `<`, whatever the
    /// configured mode. Plain text is always entity decoded, CDATA content only
    /// with [`CDataMode::OnEncoded`]. Returns the text and the offset in `span`
    /// where it ends.
    pub fn deserialize_cdata<'a>(&self, span: &'a str) -> Result<(SpanStr<'a>, usize)> {
        if span.is_empty() {
            return Ok((SpanStr::Borrowed(""), 0));
        }
        let Some(after_start) = span.strip_prefix(CDATA_START) else {
            return self.read_raw_text(span);
        };

        let end = find_seq(after_start.as_bytes(), CDATA_END.as_bytes())
            .ok_or_else(|| Error::data_format("unable to find end of cdata"))?;
        let content = &after_start[..end];
        let text = match self.params.cdata_mode {
            CDataMode::OnEncoded => decode_text(content),
            CDataMode::On | CDataMode::Off => SpanStr::Borrowed(content),
        };
        Ok((text, CDATA_START.len() + end + CDATA_END.len()))
    }

    /// Text up to the next `<`, entity decoded
    pub fn read_raw_text<'a>(&self, span: &'a str) -> Result<(SpanStr<'a>, usize)> {
        let end = find_tag_start(span.as_bytes())
            .ok_or_else(|| Error::data_format("unable to find end of text"))?;
        Ok((decode_text(&span[..end]), end))
    }

    /// Parse a primitive element body such as `<count>5</count>`
    pub fn parse_value<T: Parsable>(&self, span: &str) -> Result<(T, usize)> {
        let (text, end) = self.read_raw_text(span)?;
        Ok((self.parse(&text)?, end))
    }

    /// Parse a scalar attribute value
    pub fn parse<T: Parsable>(&self, text: &str) -> Result<T> {
        T::parse_with(text, self.params.parser)
    }

    /// Parse a separator-joined attribute value
    pub fn parse_list<T: Parsable>(&self, text: &str, separator: char) -> Result<Vec<T>> {
        StrReader::with_parser(text, separator, self.params.parser).read_all()
    }

    /// Stop parsing as soon as control returns to the engine
    ///
    /// Not an error: the read returns the target as filled so far.
    pub fn abort(&mut self) {
        if !self.aborted {
            log::debug!("parse aborted at depth {}", self.depth);
        }
        self.aborted = true;
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Current nesting depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn params(&self) -> &XmlReadParams {
        &self.params
    }
}

/// Length of `</name>` if `rest` starts with it
fn closing_tag_len(rest: &str, name: &str) -> Option<usize> {
    let tag = rest.strip_prefix("</")?.strip_prefix(name)?.strip_prefix('>')?;
    Some(rest.len() - tag.len())
}
