//! [`Element`] → XML text.
//!
//! Writes a bare fragment: no XML declaration, no doctype, no generator
//! comment. The output can be pasted straight into another document.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use super::SvgError;
use super::document::{Element, Node};

/// Serialize an element and its subtree.
pub fn write_fragment(root: &Element) -> Result<String, SvgError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(|err| SvgError::Write(err.to_string()))
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), SvgError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => emit(writer, Event::Text(BytesText::from_escaped(text.as_str())))?,
            Node::CData(data) => emit(writer, Event::CData(BytesCData::new(data.as_str())))?,
            Node::Comment(comment) => {
                emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

#[inline]
fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), SvgError> {
    writer
        .write_event(event)
        .map_err(|err| SvgError::Write(err.to_string()))
}
