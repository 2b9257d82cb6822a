//! Attribute-based bounds, used when rendering gives nothing.
//!
//! Tries, in order: the root `viewBox` size, the root `width`/`height`
//! (units stripped), then a default square.

use super::Rectangle;
use crate::svg::Element;

/// Bounds read off the root element's sizing attributes.
pub fn attribute_bounds(root: &Element, default_side: f32) -> Rectangle {
    view_box_size(root)
        .or_else(|| declared_size(root))
        .map(|(width, height)| Rectangle::from_size(width, height))
        .unwrap_or_else(|| Rectangle::square(default_side))
}

/// Width and height from a 4-token `viewBox`. The origin tokens are not
/// inspected.
fn view_box_size(root: &Element) -> Option<(f32, f32)> {
    let view_box = root.attr("viewBox")?;
    let tokens: Vec<&str> = view_box.split_whitespace().collect();
    let [_, _, width, height] = tokens.as_slice() else {
        return None;
    };
    Some((parse_extent(width)?, parse_extent(height)?))
}

/// Root `width`/`height` with every character other than digits and `.`
/// removed, so `24px` reads as 24.
fn declared_size(root: &Element) -> Option<(f32, f32)> {
    let width = strip_units(root.attr("width")?);
    let height = strip_units(root.attr("height")?);
    Some((parse_extent(&width)?, parse_extent(&height)?))
}

fn strip_units(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

#[inline]
fn parse_extent(token: &str) -> Option<f32> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_document;

    fn bounds(source: &str) -> Rectangle {
        let doc = parse_document(source).unwrap();
        attribute_bounds(doc.root(), 60.0)
    }

    #[test]
    fn test_view_box_uses_size_tokens() {
        assert_eq!(
            bounds(r#"<svg viewBox="-5 10 24 32"/>"#),
            Rectangle::from_size(24.0, 32.0)
        );
        assert_eq!(
            bounds(r#"<svg viewBox="  0   0  16.5 8 "/>"#),
            Rectangle::from_size(16.5, 8.0)
        );
        // origin tokens are ignored, even when they are not numbers
        assert_eq!(
            bounds(r#"<svg viewBox="a b 10 20"/>"#),
            Rectangle::from_size(10.0, 20.0)
        );
    }

    #[test]
    fn test_view_box_beats_width_height() {
        assert_eq!(
            bounds(r#"<svg viewBox="0 0 10 20" width="100" height="100"/>"#),
            Rectangle::from_size(10.0, 20.0)
        );
    }

    #[test]
    fn test_malformed_view_box_falls_back_to_attributes() {
        for view_box in ["", "0 0 24", "0,0,24,24", "0 0 wide 24", "0 0 24 24 1", "0 0 -1 5"] {
            let source = format!(r#"<svg viewBox="{view_box}" width="24px" height="12.5pt"/>"#);
            assert_eq!(
                bounds(&source),
                Rectangle::from_size(24.0, 12.5),
                "viewBox {view_box:?}"
            );
        }
    }

    #[test]
    fn test_width_height_without_view_box() {
        assert_eq!(
            bounds(r#"<svg width="48" height="36"/>"#),
            Rectangle::from_size(48.0, 36.0)
        );
    }

    #[test]
    fn test_default_square() {
        let default = Rectangle::square(60.0);
        assert_eq!(bounds("<svg/>"), default);
        assert_eq!(bounds(r#"<svg width="24"/>"#), default);
        assert_eq!(bounds(r#"<svg width="auto" height="auto"/>"#), default);
        assert_eq!(bounds(r#"<svg width="1.2.3" height="4"/>"#), default);
        assert_eq!(bounds(r#"<svg viewBox="x" width="" height="10"/>"#), default);
    }

    #[test]
    fn test_strip_units() {
        assert_eq!(strip_units("24px"), "24");
        assert_eq!(strip_units(" 1.5em "), "1.5");
        assert_eq!(strip_units("-3"), "3");
        assert_eq!(strip_units("auto"), "");
    }
}
