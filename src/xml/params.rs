//! Read and Write Parameters

use std::fmt;

use crate::delimited::{InvariantFormatter, StandardStrParser, StrFormatter, StrParser};

/// How element text is wrapped and escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CDataMode {
    /// Wrap text in a CDATA block, written verbatim
    #[default]
    On,
    /// No CDATA block, text is entity escaped
    Off,
    /// CDATA block with entity escaped content
    ///
    /// Not conformant XML, but survives payloads that contain `]]>`.
    OnEncoded,
}

/// Parameters for [`XmlReadBuffer`](super::XmlReadBuffer)
#[derive(Clone, Copy)]
pub struct XmlReadParams {
    /// Text block format to expect
    pub cdata_mode: CDataMode,
    /// Nesting depth at which parsing fails
    pub max_depth: usize,
    /// Parser for scalar attribute values and bodies
    pub parser: &'static dyn StrParser,
}

impl Default for XmlReadParams {
    fn default() -> Self {
        XmlReadParams {
            cdata_mode: CDataMode::On,
            max_depth: 50,
            parser: &StandardStrParser,
        }
    }
}

impl fmt::Debug for XmlReadParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlReadParams")
            .field("cdata_mode", &self.cdata_mode)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Parameters for [`XmlWriteBuffer`](super::XmlWriteBuffer)
#[derive(Clone, Copy)]
pub struct XmlWriteParams {
    /// Text block format to write
    pub cdata_mode: CDataMode,
    /// Formatter for scalar attribute values and bodies
    pub formatter: &'static dyn StrFormatter,
}

impl Default for XmlWriteParams {
    fn default() -> Self {
        XmlWriteParams {
            cdata_mode: CDataMode::On,
            formatter: &InvariantFormatter,
        }
    }
}

impl fmt::Debug for XmlWriteParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlWriteParams")
            .field("cdata_mode", &self.cdata_mode)
            .finish_non_exhaustive()
    }
}
