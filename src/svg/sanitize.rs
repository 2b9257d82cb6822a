//! Effect stripping.
//!
//! Filter effects are not rendered by the scene builder, and a dangling
//! `filter` reference makes it bail out unpredictably. Every document is
//! passed through [`sanitize`] once, right after parsing:
//!
//! 1. any element whose tag name contains `filter` is dropped with its subtree
//! 2. `filter:url(...)` clauses are cut from `style`, and `filter`
//!    attributes are removed
//!
//! Both passes are idempotent.

use regex::Regex;
use std::sync::LazyLock;

use super::document::{Document, Element, Node};

/// Substring marking an effect element's tag name.
const EFFECT_TAG: &str = "filter";

static RE_FILTER_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"filter[ \t\r\n]*:[ \t\r\n]*url\([^)]+\)[ \t\r\n]*;?").unwrap()
});

static RE_SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";{2,}").unwrap());

/// Strip filter elements and filter references from a document in place.
pub fn sanitize(document: &mut Document) {
    let root = document.root_mut();
    remove_effect_elements(root);
    strip_filter_references(root);
}

/// Drop every descendant whose tag name contains [`EFFECT_TAG`].
fn remove_effect_elements(element: &mut Element) {
    let before = element.children.len();
    element.children.retain_mut(|child| match child {
        Node::Element(child) if child.name.contains(EFFECT_TAG) => false,
        Node::Element(child) => {
            remove_effect_elements(child);
            true
        }
        _ => true,
    });

    if element.children.len() != before {
        merge_adjacent_text(&mut element.children);
    }
}

/// Join text runs left next to each other by a removed element, so the
/// tree matches what the parser produces for the written output.
fn merge_adjacent_text(children: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for child in children.drain(..) {
        if let (Node::Text(text), Some(Node::Text(previous))) = (&child, merged.last_mut()) {
            previous.push_str(text);
            continue;
        }
        merged.push(child);
    }
    *children = merged;
}

/// Remove `filter` attributes and `filter:url(...)` style clauses.
fn strip_filter_references(element: &mut Element) {
    if let Some(style) = element.attr("style") {
        match clean_style(style) {
            Some(cleaned) if cleaned.is_empty() => {
                element.remove_attr("style");
            }
            Some(cleaned) => element.set_attr("style", cleaned),
            None => {}
        }
    }

    element.remove_attr("filter");

    for child in &mut element.children {
        if let Node::Element(child) = child {
            strip_filter_references(child);
        }
    }
}

/// Returns the rewritten style, or `None` when nothing needs to change.
///
/// Cutting one clause can splice a new one together out of its
/// neighbours, so passes repeat until the text is stable.
fn clean_style(style: &str) -> Option<String> {
    let mut current = style.trim().to_string();
    loop {
        let stripped = RE_FILTER_CLAUSE.replace_all(&current, "");
        let collapsed = RE_SEPARATOR_RUN.replace_all(&stripped, ";");
        let next = collapsed.trim();
        if next == current {
            break;
        }
        current = next.to_string();
    }

    (current != style).then_some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::{parse_document, write_fragment};

    fn sanitized(source: &str) -> Document {
        let mut doc = parse_document(source).unwrap();
        sanitize(&mut doc);
        doc
    }

    #[test]
    fn test_filter_element_and_style_clause() {
        let doc = sanitized(
            r##"<svg xmlns="http://www.w3.org/2000/svg">
                <defs><filter id="f"><feGaussianBlur stdDeviation="2"/></filter></defs>
                <rect width="10" height="10" style="fill:red;filter:url(#f);"/>
            </svg>"##,
        );
        assert!(!doc.root().any(&|el| el.name.contains("filter")));
        assert!(!doc.root().any(&|el| el.name == "feGaussianBlur"));

        let defs = doc.root().child_elements().next().unwrap();
        assert_eq!(defs.name, "defs");
        let rect = doc.root().child_elements().nth(1).unwrap();
        assert_eq!(rect.attr("style"), Some("fill:red;"));
    }

    #[test]
    fn test_adjacent_filters_all_removed() {
        let doc = sanitized(
            r#"<svg><filter id="a"/><filter id="b"/><circle r="1"/><svg:filter id="c"/><x-filter-ext/></svg>"#,
        );
        let names: Vec<_> = doc
            .root()
            .child_elements()
            .map(|el| el.name.as_str())
            .collect();
        assert_eq!(names, ["circle"]);
    }

    #[test]
    fn test_filter_tag_is_case_sensitive() {
        let doc = sanitized(r#"<svg><Filter id="a"/></svg>"#);
        assert_eq!(doc.root().child_elements().count(), 1);
    }

    #[test]
    fn test_nested_filter_removed() {
        let doc = sanitized(r#"<svg><g><g><filter id="deep"/><path d="M0 0"/></g></g></svg>"#);
        assert!(!doc.root().any(&|el| el.name == "filter"));
        assert!(doc.root().any(&|el| el.name == "path"));
    }

    #[test]
    fn test_filter_attribute_removed() {
        let doc = sanitized(r##"<svg><g filter="url(#f)" fill="red"><path filter="url(#g)"/></g></svg>"##);
        assert!(!doc.root().any(&|el| el.has_attr("filter")));
        let g = doc.root().child_elements().next().unwrap();
        assert_eq!(g.attr("fill"), Some("red"));
    }

    #[test]
    fn test_style_removed_when_only_filter() {
        let doc = sanitized(r##"<svg><rect style="filter:url(#f);"/><rect style="filter:url(#f)"/></svg>"##);
        assert!(!doc.root().any(&|el| el.has_attr("style")));
    }

    #[test]
    fn test_style_separators_collapsed() {
        assert_eq!(
            clean_style("fill:red;filter:url(#f);stroke:blue").as_deref(),
            Some("fill:red;stroke:blue")
        );
        assert_eq!(
            clean_style("a:1;;;b:2; filter: url(#x) ;").as_deref(),
            Some("a:1;b:2;")
        );
        assert_eq!(clean_style("fill:red;"), None);
    }

    #[test]
    fn test_spliced_filter_clause_removed() {
        let style = "fill:red;filfilter:url(#a)ter:url(#b)";
        assert_eq!(clean_style(style).as_deref(), Some("fill:red;"));
        assert_eq!(clean_style("fill:red;"), None);

        let doc = sanitized(&format!(r#"<svg><rect style="{style}"/></svg>"#));
        let rect = doc.root().child_elements().next().unwrap();
        assert_eq!(rect.attr("style"), Some("fill:red;"));
    }

    #[test]
    fn test_text_merged_after_removal() {
        let doc = sanitized(r#"<svg><title>a<filter id="f"/>b</title></svg>"#);
        let title = doc.root().child_elements().next().unwrap();
        assert_eq!(title.children, [Node::Text("ab".into())]);

        let written = write_fragment(doc.root()).unwrap();
        assert_eq!(parse_document(&written).unwrap(), doc);
    }

    #[test]
    fn test_sanitized_document_matches_reparse() {
        let doc = sanitized(
            r##"<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <filter id="shadow"><feDropShadow dx="1" dy="1"/></filter>
  </defs>
  <rect style="fill:red;filter:url(#shadow);"/>
</svg>"##,
        );
        let written = write_fragment(doc.root()).unwrap();
        assert_eq!(parse_document(&written).unwrap(), doc);
    }

    #[test]
    fn test_idempotent() {
        let source = r##"<svg viewBox="0 0 10 10">
            <filter id="f"/>
            <g style=";;fill:red;;;filter:url(#f);;opacity:1" filter="url(#f)">
                <svg:filter/>
                <rect style=" filter:url(#f) "/>
                <path style="fill:red;filfilter:url(#a)ter:url(#b)"/>
            </g>
        </svg>"##;

        let once = sanitized(source);
        let mut twice = once.clone();
        sanitize(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(
            write_fragment(once.root()).unwrap(),
            write_fragment(twice.root()).unwrap()
        );
    }
}
