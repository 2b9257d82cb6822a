//! Raw bytes → SVG text.
//!
//! Encoding is picked in this order: byte order mark, the UTF-16 shape of a
//! leading `<?`, the `encoding` of the XML declaration, UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use quick_xml::Reader;
use quick_xml::events::Event;

use super::SvgError;

/// Decode file contents into text. Fails on an unknown declared encoding
/// or on bytes that are invalid in the chosen one.
pub fn decode_source(bytes: &[u8]) -> Result<Cow<'_, str>, SvgError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (sniff_encoding(bytes)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| SvgError::Encoding(format!("invalid {} data", encoding.name())))
}

fn sniff_encoding(bytes: &[u8]) -> Result<&'static Encoding, SvgError> {
    match bytes {
        [0x3c, 0x00, 0x3f, 0x00, ..] => return Ok(UTF_16LE),
        [0x00, 0x3c, 0x00, 0x3f, ..] => return Ok(UTF_16BE),
        _ => {}
    }

    let Some(label) = declared_encoding(bytes) else {
        return Ok(UTF_8);
    };

    // A declaration readable as ASCII cannot really be UTF-16.
    Encoding::for_label(label.as_bytes())
        .map(Encoding::output_encoding)
        .ok_or_else(|| SvgError::Encoding(format!("unsupported encoding `{label}`")))
}

/// The `encoding` pseudo-attribute of a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(bytes);
    let Ok(Event::Decl(decl)) = reader.read_event() else {
        return None;
    };
    let label = decl.encoding()?.ok()?;
    Some(String::from_utf8_lossy(&label).trim().to_string())
}
