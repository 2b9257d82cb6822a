//! XML text → [`Document`].

use std::collections::HashMap;
use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::escape::{escape, resolve_xml_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use super::SvgError;
use super::document::{Document, Element, Node};

/// Internal general entity declared in a DOCTYPE subset, e.g. the
/// `<!ENTITY ns_svg "http://www.w3.org/2000/svg">` lines vector editors emit.
static RE_ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<!ENTITY[ \t\r\n]+([^ \t\r\n%"'<>]+)[ \t\r\n]+(?:"([^"]*)"|'([^']*)')[ \t\r\n]*>"#,
    )
    .unwrap()
});

/// Entities declared in the DOCTYPE, by name.
type Entities = HashMap<String, String>;

/// Parse SVG source into a document.
///
/// Fails on malformed XML (including unbalanced or unclosed tags, duplicate
/// attributes and character data outside the root), on a missing or
/// repeated root element, and when the root is not an `svg` element.
///
/// Internal entities declared in the DOCTYPE are expanded in attribute
/// values and text.
pub fn parse_document(source: &str) -> Result<Document, SvgError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities = Entities::new();

    loop {
        let event = reader.read_event().map_err(|err| SvgError::Malformed {
            position: reader.error_position(),
            message: err.to_string(),
        })?;

        match event {
            Event::Start(start) => stack.push(element_from(&start, &entities)?),
            Event::Empty(start) => {
                let element = element_from(&start, &entities)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| SvgError::Malformed {
                    position: reader.buffer_position(),
                    message: "closing tag without matching opening tag".into(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => match stack.last_mut() {
                Some(parent) => push_text(parent, &String::from_utf8_lossy(&text)),
                None if is_xml_whitespace(&text) => {}
                None => return Err(outside_root(reader.buffer_position(), "text")),
            },
            Event::GeneralRef(entity) => {
                let name = String::from_utf8_lossy(&entity);
                let Some(parent) = stack.last_mut() else {
                    return Err(outside_root(reader.buffer_position(), "entity reference"));
                };
                match entities.get(&*name) {
                    Some(value) => push_text(parent, &escape(value.as_str())),
                    None => push_text(parent, &format!("&{name};")),
                }
            }
            Event::CData(data) => {
                let Some(parent) = stack.last_mut() else {
                    return Err(outside_root(reader.buffer_position(), "CDATA section"));
                };
                let data = String::from_utf8_lossy(&data).into_owned();
                parent.children.push(Node::CData(data));
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    let comment = String::from_utf8_lossy(&comment).into_owned();
                    parent.children.push(Node::Comment(comment));
                }
            }
            Event::DocType(doctype) => {
                entities.extend(declared_entities(&String::from_utf8_lossy(&doctype)));
            }
            Event::Decl(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(SvgError::Malformed {
            position: reader.buffer_position(),
            message: format!("unclosed element <{}>", open.name),
        });
    }

    let root = root.ok_or(SvgError::NoRoot)?;
    if root.local_name() != "svg" {
        return Err(SvgError::NotSvg(root.name));
    }

    Ok(Document::new(root))
}

/// Collect `<!ENTITY name "value">` declarations from DOCTYPE content.
/// Parameter and external entities are skipped; character references in a
/// value are expanded.
fn declared_entities(doctype: &str) -> impl Iterator<Item = (String, String)> + '_ {
    RE_ENTITY_DECL.captures_iter(doctype).filter_map(|caps| {
        let raw = caps.get(2).or_else(|| caps.get(3))?.as_str();
        let value = unescape_with(raw, resolve_xml_entity)
            .map(|value| value.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        Some((caps[1].to_string(), value))
    })
}

fn outside_root(position: u64, what: &str) -> SvgError {
    SvgError::Malformed {
        position,
        message: format!("{what} outside the root element"),
    }
}

fn is_xml_whitespace(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

/// Build an element (without children) from a start tag.
fn element_from(start: &BytesStart<'_>, entities: &Entities) -> Result<Element, SvgError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|err| SvgError::Malformed {
            position: 0,
            message: format!("bad attribute in <{}>: {err}", element.name),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape_with(&raw, |name| {
            resolve_xml_entity(name).or_else(|| entities.get(name).map(String::as_str))
        })
        .map_err(|err| SvgError::Malformed {
            position: 0,
            message: format!("bad attribute value `{key}`: {err}"),
        })?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

/// Hang a finished element under the open parent, or make it the root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), SvgError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(SvgError::MultipleRoots),
    }
    Ok(())
}

/// Append text, merging with a preceding text node (entity references
/// arrive as separate events).
fn push_text(parent: &mut Element, text: &str) {
    if let Some(Node::Text(last)) = parent.children.last_mut() {
        last.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}
