// hand-written visitors standing in for generated code

use super::*;
use crate::delimited::SpanStr;
use crate::error::{Error, Result};

fn put_text_node(buffer: &mut XmlWriteBuffer, name: &str, text: &str) {
    let node = buffer.start_node_head(name);
    buffer.put_cdata(text);
    buffer.end_node(node);
}

#[derive(Debug, Default)]
struct EmptyClass;

impl XmlSerializable<'_> for EmptyClass {
    fn node_name(&self) -> &str {
        "emptyClass"
    }
}

#[derive(Debug)]
struct VeryLongName {
    name: String,
}

impl Default for VeryLongName {
    fn default() -> Self {
        // longer than a fresh write buffer
        VeryLongName {
            name: "0".repeat(1025),
        }
    }
}

impl XmlSerializable<'_> for VeryLongName {
    fn node_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
struct StackSlam {
    children: Vec<StackSlam>,
}

impl<'a> XmlSerializable<'a> for StackSlam {
    fn node_name(&self) -> &str {
        "a"
    }

    fn parse_sub_body(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        outer: &'a str,
        _inner: &'a str,
    ) -> Result<SubBody> {
        match name {
            "a" => {
                let (child, end) = buffer.read_with_end::<StackSlam>(outer)?;
                self.children.push(child);
                Ok(SubBody::End(end))
            }
            _ => Ok(SubBody::Unhandled),
        }
    }

    fn serialize_body(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        for child in &self.children {
            buffer.put_object(child)?;
        }
        Ok(())
    }
}

fn build_stack_slammer(count: usize) -> StackSlam {
    let mut head = StackSlam::default();
    for _ in 1..count {
        head = StackSlam { children: vec![head] };
    }
    head
}

fn stack_depth(mut node: &StackSlam) -> usize {
    let mut depth = 1;
    while let Some(child) = node.children.first() {
        depth += 1;
        node = child;
    }
    depth
}

#[derive(Debug, Default, PartialEq)]
struct WithAttributes {
    int: i32,
    uint: u32,
    double: f64,
    bool: bool,
    byte: u8,
    string: String,
}

impl<'a> XmlSerializable<'a> for WithAttributes {
    fn node_name(&self) -> &str {
        "attrs"
    }

    fn parse_attribute(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        value: SpanStr<'a>,
    ) -> Result<bool> {
        match name {
            "int" => self.int = buffer.parse(&value)?,
            "uint" => self.uint = buffer.parse(&value)?,
            "double" => self.double = buffer.parse(&value)?,
            "bool" => self.bool = buffer.parse(&value)?,
            "byte" => self.byte = buffer.parse(&value)?,
            "string" => self.string = value.into_owned(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn serialize_attributes(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        buffer.put_attribute_value("int", &self.int)?;
        buffer.put_attribute_value("uint", &self.uint)?;
        buffer.put_attribute_value("double", &self.double)?;
        buffer.put_attribute_bool("bool", self.bool);
        buffer.put_attribute_value("byte", &self.byte)?;
        buffer.put_attribute("string", &self.string);
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
struct StringBodies {
    a: String,
    b: String,
    null: Option<String>,
    empty: String,
}

impl<'a> XmlSerializable<'a> for StringBodies {
    fn node_name(&self) -> &str {
        "stringbodies"
    }

    fn parse_sub_body(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        _outer: &'a str,
        inner: &'a str,
    ) -> Result<SubBody> {
        let field = match name {
            "a" => &mut self.a,
            "b" => &mut self.b,
            "null" => self.null.get_or_insert_with(String::new),
            "empty" => &mut self.empty,
            _ => return Ok(SubBody::Unhandled),
        };
        let (text, end) = buffer.deserialize_cdata(inner)?;
        *field = text.into_owned();
        Ok(SubBody::EndInner(end))
    }

    fn serialize_body(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        put_text_node(buffer, "a", &self.a);
        put_text_node(buffer, "b", &self.b);
        if let Some(null) = &self.null {
            put_text_node(buffer, "null", null);
        }
        put_text_node(buffer, "empty", &self.empty);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StringBody {
    full_body: String,
}

impl<'a> XmlSerializable<'a> for StringBody {
    fn node_name(&self) -> &str {
        "stringbody"
    }

    fn parse_full_body(
        &mut self,
        buffer: &mut XmlReadBuffer,
        body: &'a str,
    ) -> Result<Option<usize>> {
        let (text, end) = buffer.deserialize_cdata(body)?;
        self.full_body = text.into_owned();
        Ok(Some(end))
    }

    fn serialize_body(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        buffer.put_cdata(&self.full_body);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("crash requested")]
struct TestCrash;

#[derive(Debug, Default)]
struct AbortClassBase {
    abort_if_present: Option<String>,
    crash_if_present: Option<String>,
}

impl<'a> XmlSerializable<'a> for AbortClassBase {
    fn node_name(&self) -> &str {
        "abort"
    }

    fn parse_sub_body(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        _outer: &'a str,
        inner: &'a str,
    ) -> Result<SubBody> {
        let field = match name {
            "abortIfPresent" => &mut self.abort_if_present,
            "crashIfPresent" => &mut self.crash_if_present,
            _ => return Ok(SubBody::Unhandled),
        };
        let (text, end) = buffer.deserialize_cdata(inner)?;
        *field = Some(text.into_owned());
        Ok(SubBody::EndInner(end))
    }
}

#[derive(Debug, Default)]
struct AbortClass {
    base: AbortClassBase,
}

impl<'a> XmlSerializable<'a> for AbortClass {
    fn node_name(&self) -> &str {
        self.base.node_name()
    }

    fn parse_sub_body(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        outer: &'a str,
        inner: &'a str,
    ) -> Result<SubBody> {
        match name {
            "abortIfPresent" => {
                let handled = self.base.parse_sub_body(buffer, name, outer, inner)?;
                buffer.abort();
                Ok(handled)
            }
            "crashIfPresent" => Err(Error::custom(TestCrash)),
            _ => self.base.parse_sub_body(buffer, name, outer, inner),
        }
    }
}

/// Keeps attribute text borrowed from the input where possible
#[derive(Debug, Default)]
struct Borrowing<'a> {
    label: SpanStr<'a>,
}

impl<'a> XmlSerializable<'a> for Borrowing<'a> {
    fn node_name(&self) -> &str {
        "borrowing"
    }

    fn parse_attribute(
        &mut self,
        _buffer: &mut XmlReadBuffer,
        name: &'a str,
        value: SpanStr<'a>,
    ) -> Result<bool> {
        if name != "label" {
            return Ok(false);
        }
        self.label = value;
        Ok(true)
    }

    fn serialize_attributes(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        buffer.put_attribute_value("label", &self.label)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Stats {
    ids: Vec<u32>,
    count: u64,
}

impl<'a> XmlSerializable<'a> for Stats {
    fn node_name(&self) -> &str {
        "stats"
    }

    fn parse_attribute(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        value: SpanStr<'a>,
    ) -> Result<bool> {
        if name != "ids" {
            return Ok(false);
        }
        self.ids = buffer.parse_list(&value, ',')?;
        Ok(true)
    }

    fn parse_sub_body(
        &mut self,
        buffer: &mut XmlReadBuffer,
        name: &'a str,
        _outer: &'a str,
        inner: &'a str,
    ) -> Result<SubBody> {
        if name != "count" {
            return Ok(SubBody::Unhandled);
        }
        let (count, end) = buffer.parse_value(inner)?;
        self.count = count;
        Ok(SubBody::EndInner(end))
    }

    fn serialize_attributes(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        buffer.put_attribute_list("ids", &self.ids, ',')
    }

    fn serialize_body(&self, buffer: &mut XmlWriteBuffer) -> Result<()> {
        let node = buffer.start_node_head("count");
        buffer.put_value(&self.count)?;
        buffer.end_node(node);
        Ok(())
    }
}

struct Unnamed;

impl XmlSerializable<'_> for Unnamed {
    fn node_name(&self) -> &str {
        ""
    }
}

const ALL_MODES: [CDataMode; 3] = [CDataMode::Off, CDataMode::On, CDataMode::OnEncoded];

#[test]
fn serialize_unnamed_top_level() {
    let err = XmlWriteBuffer::serialize_static(&Unnamed, CDataMode::On).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn serialize_empty() {
    let result = XmlWriteBuffer::serialize_static(&EmptyClass, CDataMode::On).unwrap();
    assert_eq!(result, "<emptyClass/>");
}

#[test]
fn serialize_long_name() {
    let long = VeryLongName::default();
    let result = XmlWriteBuffer::serialize_static(&long, CDataMode::On).unwrap();
    assert_eq!(result, format!("<{}/>", long.name));

    let read: VeryLongName = XmlReadBuffer::read_static(&result, CDataMode::On).unwrap();
    assert_eq!(read.name.len(), 1025);
}

#[test]
fn serialize_attributes() {
    let truth = WithAttributes {
        int: -1,
        uint: u32::MAX,
        double: 3.14,
        bool: true,
        byte: 128,
        string: "david and tim<".to_owned(),
    };

    let expected = concat!(
        "<attrs int='-1' uint='4294967295' double='3.14' bool='1' byte='128' ",
        "string='david and tim&lt;'/>"
    );
    let compact = concat!(
        "<attrs int='-1'uint='4294967295'double='3.14'bool='1'byte='128'",
        "string='david and tim&lt;'/>"
    );
    let with_decl = format!("<?xml version='1.0'?>{expected}");
    let with_comment =
        format!("<?xml version='1.0'?><!--<attrs wont be parsed in comment>-->{expected}");

    let result = XmlWriteBuffer::serialize_static(&truth, CDataMode::On).unwrap();
    assert_eq!(result, expected);

    for input in [expected, compact, with_decl.as_str(), with_comment.as_str()] {
        let read: WithAttributes = XmlReadBuffer::read_static(input, CDataMode::On).unwrap();
        assert_eq!(read, truth, "{input}");
    }
}

#[test]
fn double_quoted_attributes() {
    let read: WithAttributes =
        XmlReadBuffer::read_static("<attrs int=\"5\" string=\"it's\"/>", CDataMode::On).unwrap();
    assert_eq!(read.int, 5);
    assert_eq!(read.string, "it's");
}

#[test]
fn attribute_text_round_trip() {
    let truth = WithAttributes {
        string: "She said \"You're right\"\n\tok".to_owned(),
        ..Default::default()
    };
    let result = XmlWriteBuffer::serialize_static(&truth, CDataMode::Off).unwrap();
    assert!(result.contains("string='She said &quot;You&apos;re right&quot;&#xA;&#x9;ok'"));

    let read: WithAttributes = XmlReadBuffer::read_static(&result, CDataMode::Off).unwrap();
    assert_eq!(read, truth);
}

#[test]
fn serialize_string_bodies() {
    let truth = StringBodies {
        a: "blah1<>&&".to_owned(),
        b: "blah2".to_owned(),
        null: None,
        empty: String::new(),
    };
    for mode in ALL_MODES {
        let result = XmlWriteBuffer::serialize_static(&truth, mode).unwrap();
        let read: StringBodies = XmlReadBuffer::read_static(&result, mode).unwrap();
        assert_eq!(read, truth, "{mode:?}: {result}");
    }
}

#[test]
fn serialize_string_body() {
    let truth = StringBody {
        full_body: "asdjhasjkdhakjsdhjkahsdjhkasdhasd<>&&".to_owned(),
    };
    for mode in ALL_MODES {
        let result = XmlWriteBuffer::serialize_static(&truth, mode).unwrap();
        let read: StringBody = XmlReadBuffer::read_static(&result, mode).unwrap();
        assert_eq!(read.full_body, truth.full_body, "{mode:?}: {result}");
    }
}

#[test]
fn string_body_wire_format() {
    let truth = StringBody {
        full_body: "a<b".to_owned(),
    };
    let off = XmlWriteBuffer::serialize_static(&truth, CDataMode::Off).unwrap();
    assert_eq!(off, "<stringbody>a&lt;b</stringbody>");
    let on = XmlWriteBuffer::serialize_static(&truth, CDataMode::On).unwrap();
    assert_eq!(on, "<stringbody><![CDATA[a<b]]></stringbody>");

    // the reader accepts either form whatever its mode
    let read: StringBody = XmlReadBuffer::read_static(&on, CDataMode::Off).unwrap();
    assert_eq!(read.full_body, "a<b");
    let read: StringBody = XmlReadBuffer::read_static(&off, CDataMode::On).unwrap();
    assert_eq!(read.full_body, "a<b");
}

#[test]
fn full_body_must_be_followed_by_closing_tag() {
    let err = XmlReadBuffer::read_static::<StringBody>("<stringbody>text</other>", CDataMode::Off)
        .unwrap_err();
    assert!(err.is_data_format());
    let err = XmlReadBuffer::read_static::<StringBody>(
        "<stringbody><![CDATA[text]]>junk</stringbody>",
        CDataMode::On,
    )
    .unwrap_err();
    assert!(err.is_data_format());
}

#[test]
fn handle_unknown_bodies() {
    fn fails<'a, T>(input: &'a str) -> bool
    where
        T: XmlSerializable<'a> + Default + std::fmt::Debug,
    {
        XmlReadBuffer::read_static::<T>(input, CDataMode::On)
            .unwrap_err()
            .is_data_format()
    }

    let input = "<dave><tim></tim></dave>";
    assert!(fails::<EmptyClass>(input));
    assert!(fails::<VeryLongName>(input));
    assert!(fails::<StackSlam>(input));
    assert!(fails::<WithAttributes>(input));
    assert!(fails::<StringBodies>(input));
}

#[test]
fn handle_unknown_attributes() {
    let read: WithAttributes =
        XmlReadBuffer::read_static("<attrs newAttr='anything'/>", CDataMode::On).unwrap();
    assert_eq!(read, WithAttributes::default());
}

#[test]
fn nameless_attribute_is_rejected() {
    for input in ["<attrs ='1'/>", "<attrs int='1' ='2'/>", "<attrs int='1'\n  ='2'></attrs>"] {
        let err = XmlReadBuffer::read_static::<WithAttributes>(input, CDataMode::On).unwrap_err();
        assert!(err.is_data_format(), "{input}");
    }
}

#[test]
fn slam_stack_serialize() {
    let head = build_stack_slammer(200);
    let result = XmlWriteBuffer::serialize_static(&head, CDataMode::On).unwrap();
    assert!(result.starts_with("<a><a>"));
    assert!(result.ends_with("</a></a>"));
    assert_eq!(result.matches("<a/>").count(), 1);
}

#[test]
fn slam_stack_deserialize() {
    let max_depth = XmlReadParams::default().max_depth;
    let head = build_stack_slammer(max_depth - 1);
    let serialized = XmlWriteBuffer::serialize_static(&head, CDataMode::On).unwrap();

    let mut buffer = XmlReadBuffer::new();
    let read: StackSlam = buffer.read(&serialized).unwrap();
    assert_eq!(stack_depth(&read), max_depth - 1);
    assert_eq!(buffer.depth(), 0);
}

#[test]
fn slam_stack_deserialize_error() {
    let max_depth = XmlReadParams::default().max_depth;
    let head = build_stack_slammer(max_depth);
    let serialized = XmlWriteBuffer::serialize_static(&head, CDataMode::On).unwrap();

    let err = XmlReadBuffer::read_static::<StackSlam>(&serialized, CDataMode::On).unwrap_err();
    assert!(matches!(err, Error::RecursionLimitExceeded { max_depth: 50 }));
}

#[test]
fn abort_no_crash() {
    let input = concat!(
        "<abort><abortIfPresent>gonna do this first</abortIfPresent>",
        "<crashIfPresent>yep</crashIfPresent></abort>"
    );
    let mut buffer = XmlReadBuffer::new();
    let (parsed, end) = buffer.read_with_end::<AbortClass>(input).unwrap();
    assert!(buffer.is_aborted());
    assert_eq!(buffer.depth(), 0);
    assert_eq!(end, input.len());
    assert_eq!(parsed.base.abort_if_present.as_deref(), Some("gonna do this first"));
    assert_eq!(parsed.base.crash_if_present, None);
}

#[test]
fn abort_inside_nested_read() {
    #[derive(Debug, Default)]
    struct Holder {
        inner: AbortClass,
        after: bool,
    }

    impl<'a> XmlSerializable<'a> for Holder {
        fn node_name(&self) -> &str {
            "holder"
        }

        fn parse_sub_body(
            &mut self,
            buffer: &mut XmlReadBuffer,
            name: &'a str,
            outer: &'a str,
            _inner: &'a str,
        ) -> Result<SubBody> {
            match name {
                "abort" => buffer.read_into(outer, &mut self.inner).map(SubBody::End),
                "after" => {
                    self.after = true;
                    Ok(SubBody::End(outer.len()))
                }
                _ => Ok(SubBody::Unhandled),
            }
        }
    }

    let input = "<holder><abort><abortIfPresent>x</abortIfPresent></abort><after/></holder>";
    let mut buffer = XmlReadBuffer::new();
    let holder: Holder = buffer.read(input).unwrap();
    assert!(buffer.is_aborted());
    assert_eq!(buffer.depth(), 0);
    assert_eq!(holder.inner.base.abort_if_present.as_deref(), Some("x"));
    assert!(!holder.after);
}

#[test]
fn abort_crash() {
    let input = "<abort><crashIfPresent>yep</crashIfPresent></abort>";
    let err = XmlReadBuffer::read_static::<AbortClass>(input, CDataMode::On).unwrap_err();
    match err {
        Error::Custom(inner) => assert!(inner.downcast_ref::<TestCrash>().is_some()),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn borrowed_attribute_text() {
    let read: Borrowing =
        XmlReadBuffer::read_static("<borrowing label='plain'/>", CDataMode::On).unwrap();
    assert!(read.label.is_borrowed());
    assert_eq!(read.label, "plain");

    let read: Borrowing =
        XmlReadBuffer::read_static("<borrowing label='a &amp; b'/>", CDataMode::On).unwrap();
    assert!(!read.label.is_borrowed());
    assert_eq!(read.label, "a & b");
}

#[test]
fn formatted_attribute_round_trip() {
    let truth = Borrowing {
        label: SpanStr::new("it's <b> & \"c\""),
    };
    let result = XmlWriteBuffer::serialize_static(&truth, CDataMode::On).unwrap();
    assert_eq!(result, "<borrowing label='it&apos;s &lt;b&gt; &amp; &quot;c&quot;'/>");

    let read: Borrowing = XmlReadBuffer::read_static(&result, CDataMode::On).unwrap();
    assert_eq!(read.label, truth.label);
}

#[test]
fn list_attribute_and_value_body() {
    let truth = Stats {
        ids: vec![1, 2, 3],
        count: 42,
    };
    let result = XmlWriteBuffer::serialize_static(&truth, CDataMode::On).unwrap();
    assert_eq!(result, "<stats ids='1,2,3'><count>42</count></stats>");

    let read: Stats = XmlReadBuffer::read_static(&result, CDataMode::On).unwrap();
    assert_eq!(read, truth);

    let empty: Stats =
        XmlReadBuffer::read_static("<stats ids=''><count>0</count></stats>", CDataMode::On)
            .unwrap();
    assert!(empty.ids.is_empty());
}
