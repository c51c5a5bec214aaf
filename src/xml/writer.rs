//! Tree → text adapter.
//!
//! Produces the canonical persisted form: XML declaration, 2-space
//! indentation, UTF-8, trailing newline. Self-closing tags are used for
//! childless elements.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::tree::{XmlElement, XmlNode};

const INDENT_CHAR: u8 = b' ';
const INDENT_SIZE: usize = 2;

/// Serialize a tree to its canonical indented textual form.
///
/// Writing targets an in-memory buffer, which cannot fail, and the
/// writer emits only valid UTF-8; serialization therefore has no error
/// path.
pub fn write_document(root: &XmlElement) -> String {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new_with_indent(&mut buffer, INDENT_CHAR, INDENT_SIZE);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .and_then(|()| write_element(&mut writer, root))
        .expect("in-memory XML write");

    let mut output = buffer.into_inner();
    output.push(b'\n');
    String::from_utf8(output).expect("writer emits UTF-8")
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> std::io::Result<()> {
    let mut start = BytesStart::new(element.tag());
    for (name, value) in element.attributes() {
        start.push_attribute((name, value));
    }

    if !element.has_children() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        match child {
            XmlNode::Element(el) => write_element(writer, el)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.tag())))?;
    Ok(())
}
