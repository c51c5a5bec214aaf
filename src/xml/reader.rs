//! Text → tree adapter.
//!
//! Streams quick-xml events into an [`XmlElement`] tree. All failures
//! carry a [`Position`] computed from the reader's byte offset so a
//! view layer can place a caret on the offending location.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::base::Position;

use super::tree::{XmlElement, XmlNode};

/// A well-formedness failure, with the location it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct ReadError {
    pub message: String,
    pub position: Position,
}

impl ReadError {
    fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Parse `text` into an element tree.
///
/// Whitespace-only character data is dropped and surrounding whitespace
/// is trimmed from text runs, so reparsing serialized output yields a
/// structurally equal tree regardless of indentation. Trimming happens
/// per completed element, after adjacent runs and entity references are
/// merged; quick-xml's own `trim_text` would clip the fragments around
/// each reference instead.
pub fn read_document(text: &str) -> Result<XmlElement, ReadError> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let at = Position::at_offset(text, reader.buffer_position() as usize);

        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let el = element_from_start(text, &reader, e)?;
                stack.push(el);
            }
            Ok(Event::Empty(ref e)) => {
                let el = element_from_start(text, &reader, e)?;
                attach(&mut stack, &mut root, el, at)?;
            }
            Ok(Event::End(_)) => {
                // check_end_names is on, so quick-xml has already verified
                // the tag matches; an empty stack cannot happen here.
                let el = stack
                    .pop()
                    .ok_or_else(|| ReadError::new("unexpected closing tag", at))?;
                attach(&mut stack, &mut root, el, at)?;
            }
            Ok(Event::Text(ref t)) => {
                let content = t
                    .xml_content()
                    .map_err(|e| ReadError::new(format!("invalid character data: {e}"), at))?;
                append_text(&mut stack, &content, at)?;
            }
            Ok(Event::CData(ref t)) => {
                let content = String::from_utf8_lossy(t).into_owned();
                append_text(&mut stack, &content, at)?;
            }
            Ok(Event::GeneralRef(ref r)) => {
                let name = String::from_utf8_lossy(r).into_owned();
                let resolved = resolve_entity(&name).ok_or_else(|| {
                    ReadError::new(format!("unknown entity reference &{name};"), at)
                })?;
                append_text(&mut stack, &resolved, at)?;
            }
            // Prolog and annotations carry no tree content
            Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {}
            Ok(Event::Eof) => {
                if let Some(open) = stack.last() {
                    return Err(ReadError::new(
                        format!("unclosed element <{}>", open.tag()),
                        Position::at_offset(text, text.len()),
                    ));
                }
                break;
            }
            Err(e) => {
                return Err(ReadError::new(
                    format!("{e}"),
                    Position::at_offset(text, reader.error_position() as usize),
                ));
            }
        }
    }

    root.ok_or_else(|| ReadError::new("document has no root element", Position::new(1, 1)))
}

/// Build an element from a start (or self-closing) tag.
fn element_from_start(
    text: &str,
    reader: &Reader<&[u8]>,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<XmlElement, ReadError> {
    let at = Position::at_offset(text, reader.buffer_position() as usize);

    let name = e.name();
    let tag = std::str::from_utf8(name.as_ref())
        .map_err(|err| ReadError::new(format!("invalid tag name: {err}"), at))?;
    let mut el = XmlElement::new(tag);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ReadError::new(format!("invalid attribute: {err}"), at))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| ReadError::new(format!("invalid attribute name: {err}"), at))?;
        let value = attr
            .unescape_value()
            .map_err(|err| ReadError::new(format!("invalid attribute value: {err}"), at))?;
        el.set_attribute(key, value.into_owned());
    }

    Ok(el)
}

/// Hand a completed element to its parent, or make it the root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    mut el: XmlElement,
    at: Position,
) -> Result<(), ReadError> {
    el.normalize_text();
    if let Some(parent) = stack.last_mut() {
        parent.append_element(el);
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err(ReadError::new("multiple root elements", at))
    }
}

/// Append character data to the open element, merging adjacent runs so
/// entity references do not split text into separate nodes.
fn append_text(stack: &mut [XmlElement], content: &str, at: Position) -> Result<(), ReadError> {
    let Some(parent) = stack.last_mut() else {
        // Inter-element whitespace around the root is legal
        if content.trim().is_empty() {
            return Ok(());
        }
        return Err(ReadError::new("character data outside the root element", at));
    };
    if let Some(XmlNode::Text(last)) = parent.last_child_mut() {
        last.push_str(content);
    } else {
        parent.append_text(content);
    }
    Ok(())
}

/// Resolve a predefined or character entity reference.
fn resolve_entity(name: &str) -> Option<String> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "quot" => '"',
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)?
        }
    };
    Some(ch.to_string())
}
