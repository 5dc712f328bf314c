//! Markup serialization.
//!
//! Rebuilds markup text from a mutated tree. Attribute and style keys are
//! emitted in sorted order so equal trees always serialize to equal
//! strings, which the engine's determinism guarantees rely on.

use crate::dom::ParsedElement;

/// Serialize a single element, its text and its subtree
pub fn serialize_element(element: &ParsedElement) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

/// Serialize an element's inner markup: direct text, then child subtrees
pub fn serialize_inner(element: &ParsedElement) -> String {
    let mut out = String::new();
    write_inner(element, &mut out);
    out
}

fn write_element(element: &ParsedElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag_name);

    let mut names: Vec<&String> = element.attributes.keys().collect();
    names.sort();
    for name in names {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_html(&element.attributes[name]));
        out.push('"');
    }

    if !element.inline_styles.is_empty() {
        let mut properties: Vec<&String> = element.inline_styles.keys().collect();
        properties.sort();
        let style = properties
            .iter()
            .map(|prop| format!("{}: {};", prop, element.inline_styles[*prop]))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(" style=\"");
        out.push_str(&escape_html(&style));
        out.push('"');
    }

    if is_void_element(&element.tag_name)
        && element.children.is_empty()
        && element.text_content.is_empty()
    {
        out.push_str(" />");
        return;
    }

    out.push('>');
    write_inner(element, out);
    out.push_str("</");
    out.push_str(&element.tag_name);
    out.push('>');
}

fn write_inner(element: &ParsedElement, out: &mut String) {
    if !element.text_content.is_empty() {
        out.push_str(&escape_html(&element.text_content));
    }
    for child in &element.children {
        write_element(child, out);
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
