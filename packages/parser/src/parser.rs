//! Lenient HTML parsing.
//!
//! Matches common browser-parser leniency: malformed markup is
//! auto-corrected rather than rejected. Stray end tags are dropped and
//! elements still open at end of input fold into their ancestors.
//!
//! The parse result's `root` is always a synthetic `body` element holding
//! the markup's top-level nodes, so fragment input round-trips through
//! [`crate::serializer::serialize_inner`].

use crate::dom::{ExternalResources, HtmlParseResult, ParsedElement};
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::selector::assign_selectors;
use crate::serializer::is_void_element;
use std::collections::HashMap;

/// Parse markup with a fresh parser
pub fn parse(markup: &str) -> ParseResult<HtmlParseResult> {
    HtmlParser::new().parse(markup)
}

/// Parses raw HTML into a mutable element tree
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, markup: &str) -> ParseResult<HtmlParseResult> {
        let mut ids = IdGenerator::new(markup);
        let mut root = ParsedElement::new("body", ids.new_id());
        root.selector = "body".to_string();

        let mut styles = String::new();
        let mut scripts = String::new();
        let mut external = ExternalResources::default();

        // Open-element stack; the synthetic root sits at the bottom.
        let mut stack: Vec<ParsedElement> = vec![root];

        let bytes = markup.as_bytes();
        let mut idx = 0usize;

        while idx < bytes.len() {
            if bytes[idx] != b'<' {
                let next = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
                if let Some(top) = stack.last_mut() {
                    append_text(top, &markup[idx..next]);
                }
                idx = next;
                continue;
            }

            if starts_with(bytes, idx, b"<!--") {
                idx = skip_comment(bytes, idx);
                continue;
            }

            if starts_with(bytes, idx, b"<!") || starts_with(bytes, idx, b"<?") {
                idx = skip_to_gt(bytes, idx + 2);
                continue;
            }

            let Some((tag, next_idx)) = parse_tag(markup, idx) else {
                // A lone `<` that never forms a tag reads as text
                if let Some(top) = stack.last_mut() {
                    append_text(top, "<");
                }
                idx += 1;
                continue;
            };

            if tag.is_end {
                close_tag(&mut stack, &tag.name);
                idx = next_idx;
                continue;
            }

            match tag.name.as_str() {
                "style" if !tag.self_closing => {
                    let (raw, after) = read_raw_text_until_end_tag(markup, next_idx, "style");
                    push_block(&mut styles, raw);
                    idx = after;
                }
                "script" => {
                    if let Some(src) = tag.attr("src") {
                        external.scripts.push(src.to_string());
                        idx = if tag.self_closing {
                            next_idx
                        } else {
                            read_raw_text_until_end_tag(markup, next_idx, "script").1
                        };
                    } else if tag.self_closing {
                        idx = next_idx;
                    } else {
                        let (raw, after) = read_raw_text_until_end_tag(markup, next_idx, "script");
                        push_block(&mut scripts, raw);
                        idx = after;
                    }
                }
                "link" => {
                    let is_stylesheet = tag
                        .attr("rel")
                        .map(|rel| rel.eq_ignore_ascii_case("stylesheet"))
                        .unwrap_or(false);
                    if is_stylesheet {
                        if let Some(href) = tag.attr("href") {
                            external.stylesheets.push(href.to_string());
                        }
                    } else if let Some(top) = stack.last_mut() {
                        top.children.push(make_element(&tag, &mut ids));
                    }
                    idx = next_idx;
                }
                _ => {
                    let element = make_element(&tag, &mut ids);
                    if tag.name == "img" {
                        if let Some(src) = element.attributes.get("src") {
                            external.images.push(src.clone());
                        }
                    }
                    if tag.self_closing || is_void_element(&tag.name) {
                        if let Some(top) = stack.last_mut() {
                            top.children.push(element);
                        }
                    } else {
                        stack.push(element);
                    }
                    idx = next_idx;
                }
            }
        }

        // Fold elements left open at end of input
        while stack.len() > 1 {
            let Some(element) = stack.pop() else { break };
            if let Some(top) = stack.last_mut() {
                top.children.push(element);
            }
        }

        let mut root = stack
            .pop()
            .ok_or_else(|| ParseError::invalid_markup(0, "element stack exhausted"))?;
        assign_selectors(&mut root);

        let mut element_map = HashMap::new();
        index_elements(&root, &mut element_map);

        Ok(HtmlParseResult {
            root,
            element_map,
            styles,
            scripts,
            external_resources: external,
        })
    }
}

fn make_element(tag: &RawTag, ids: &mut IdGenerator) -> ParsedElement {
    let mut element = ParsedElement::new(tag.name.clone(), ids.new_id());
    for (name, value) in &tag.attributes {
        if name == "style" {
            element.inline_styles = parse_style_attribute(value);
        } else {
            element.attributes.insert(name.clone(), value.clone());
        }
    }
    element
}

/// Close the innermost open element with a matching name. An end tag with
/// no matching open element is dropped; the synthetic root never closes.
fn close_tag(stack: &mut Vec<ParsedElement>, name: &str) {
    let Some(open_idx) = stack.iter().rposition(|el| el.tag_name == name) else {
        return;
    };
    if open_idx == 0 {
        return;
    }
    while stack.len() > open_idx {
        let Some(element) = stack.pop() else { return };
        if let Some(top) = stack.last_mut() {
            top.children.push(element);
        }
    }
}

fn index_elements(element: &ParsedElement, map: &mut HashMap<String, ParsedElement>) {
    map.insert(element.identifier.clone(), element.clone());
    for child in &element.children {
        index_elements(child, map);
    }
}

fn append_text(element: &mut ParsedElement, raw: &str) {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return;
    }
    if !element.text_content.is_empty() {
        element.text_content.push(' ');
    }
    element.text_content.push_str(&unescape_html(&collapsed));
}

fn push_block(buffer: &mut String, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(trimmed);
}

/// Split a `style` attribute into hyphenated property/value pairs.
/// Declarations without a colon or with an empty side are dropped.
fn parse_style_attribute(value: &str) -> HashMap<String, String> {
    let mut styles = HashMap::new();
    for declaration in value.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }
        styles.insert(property.to_string(), value.to_string());
    }
    styles
}

#[derive(Debug, Clone)]
struct RawTag {
    name: String,
    attributes: Vec<(String, String)>,
    is_end: bool,
    self_closing: bool,
}

impl RawTag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }
}

fn parse_tag(input: &str, start: usize) -> Option<(RawTag, usize)> {
    let bytes = input.as_bytes();
    if bytes.get(start).copied() != Some(b'<') {
        return None;
    }

    let mut idx = start + 1;
    let mut is_end = false;
    if bytes.get(idx).copied() == Some(b'/') {
        is_end = true;
        idx += 1;
    }

    idx = skip_spaces(bytes, idx);
    let name_start = idx;
    while idx < bytes.len() && is_tag_name_char(bytes[idx]) {
        idx += 1;
    }
    if idx == name_start {
        return None;
    }
    let name = input[name_start..idx].to_ascii_lowercase();

    let mut attributes = Vec::new();
    loop {
        idx = skip_spaces(bytes, idx);
        match bytes.get(idx).copied() {
            None => return None,
            Some(b'>') => return Some((make_raw_tag(name, attributes, is_end, false), idx + 1)),
            Some(b'/') => {
                if bytes.get(idx + 1).copied() == Some(b'>') {
                    return Some((make_raw_tag(name, attributes, is_end, true), idx + 2));
                }
                idx += 1;
            }
            Some(_) => {
                let attr_start = idx;
                while idx < bytes.len()
                    && !bytes[idx].is_ascii_whitespace()
                    && !matches!(bytes[idx], b'=' | b'>' | b'/')
                {
                    idx += 1;
                }
                if idx == attr_start {
                    idx += 1;
                    continue;
                }
                let attr_name = input[attr_start..idx].to_ascii_lowercase();

                idx = skip_spaces(bytes, idx);
                let value = if bytes.get(idx).copied() == Some(b'=') {
                    idx = skip_spaces(bytes, idx + 1);
                    match bytes.get(idx).copied() {
                        Some(quote @ (b'"' | b'\'')) => {
                            let value_start = idx + 1;
                            let end = find_byte(bytes, value_start, quote).unwrap_or(bytes.len());
                            idx = (end + 1).min(bytes.len());
                            input[value_start..end].to_string()
                        }
                        _ => {
                            let value_start = idx;
                            while idx < bytes.len()
                                && !bytes[idx].is_ascii_whitespace()
                                && bytes[idx] != b'>'
                            {
                                idx += 1;
                            }
                            input[value_start..idx].to_string()
                        }
                    }
                } else {
                    String::new()
                };
                attributes.push((attr_name, unescape_html(&value)));
            }
        }
    }
}

fn make_raw_tag(
    name: String,
    attributes: Vec<(String, String)>,
    is_end: bool,
    self_closing: bool,
) -> RawTag {
    RawTag {
        name,
        attributes,
        is_end,
        self_closing,
    }
}

/// Read raw element content (script/style) up to the matching end tag.
/// Returns the content slice and the index just past the end tag.
fn read_raw_text_until_end_tag<'a>(
    input: &'a str,
    start: usize,
    tag_name: &str,
) -> (&'a str, usize) {
    let bytes = input.as_bytes();
    let tag_bytes = tag_name.as_bytes();
    let mut idx = start;

    while idx < bytes.len() {
        if bytes[idx] == b'<'
            && bytes.get(idx + 1).copied() == Some(b'/')
            && starts_with_ignore_ascii_case(bytes, idx + 2, tag_bytes)
            && tag_name_boundary(bytes, idx + 2 + tag_bytes.len())
        {
            let after = skip_to_gt(bytes, idx + 2);
            return (&input[start..idx], after);
        }
        idx += 1;
    }

    (&input[start..], bytes.len())
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    find_subslice(bytes, start + 4, b"-->")
        .map(|end| end + 3)
        .unwrap_or(bytes.len())
}

fn skip_to_gt(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() {
        if bytes[idx] == b'>' {
            return idx + 1;
        }
        idx += 1;
    }
    bytes.len()
}

fn skip_spaces(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

fn tag_name_boundary(bytes: &[u8], idx: usize) -> bool {
    match bytes.get(idx).copied() {
        None => true,
        Some(byte) => byte.is_ascii_whitespace() || byte == b'>' || byte == b'/',
    }
}

fn is_tag_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

fn starts_with(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx + pattern.len();
    end <= bytes.len() && bytes[idx..end] == *pattern
}

fn starts_with_ignore_ascii_case(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx + pattern.len();
    if end > bytes.len() {
        return false;
    }
    bytes[idx..end]
        .iter()
        .zip(pattern.iter())
        .all(|(left, right)| left.eq_ignore_ascii_case(right))
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

fn find_byte(bytes: &[u8], from: usize, byte: u8) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|candidate| *candidate == byte)
        .map(|offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fragment() {
        let result = parse("<div class=\"test\">Original</div>").unwrap();

        assert_eq!(result.root.tag_name, "body");
        assert_eq!(result.root.children.len(), 1);

        let div = &result.root.children[0];
        assert_eq!(div.tag_name, "div");
        assert_eq!(div.attributes.get("class"), Some(&"test".to_string()));
        assert_eq!(div.text_content, "Original");
    }

    #[test]
    fn test_parse_nested_elements() {
        let result = parse("<section><h1>Title</h1><p>Body text</p></section>").unwrap();

        let section = &result.root.children[0];
        assert_eq!(section.tag_name, "section");
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[0].tag_name, "h1");
        assert_eq!(section.children[1].text_content, "Body text");
    }

    #[test]
    fn test_style_attribute_becomes_inline_styles() {
        let result = parse("<div style=\"color: red; font-size: 14px\">x</div>").unwrap();

        let div = &result.root.children[0];
        assert!(div.attributes.get("style").is_none());
        assert_eq!(div.inline_styles.get("color"), Some(&"red".to_string()));
        assert_eq!(div.inline_styles.get("font-size"), Some(&"14px".to_string()));
    }

    #[test]
    fn test_aggregates_styles_and_scripts() {
        let result = parse(
            "<style>.a { color: red; }</style><div>Hi</div><script>console.log(1);</script>",
        )
        .unwrap();

        assert_eq!(result.styles, ".a { color: red; }");
        assert_eq!(result.scripts, "console.log(1);");
        // Neither style nor script become tree nodes
        assert_eq!(result.root.children.len(), 1);
        assert_eq!(result.root.children[0].tag_name, "div");
    }

    #[test]
    fn test_collects_external_resources() {
        let result = parse(
            "<link rel=\"stylesheet\" href=\"/main.css\">\
             <script src=\"/app.js\"></script>\
             <img src=\"/logo.png\">",
        )
        .unwrap();

        assert_eq!(result.external_resources.stylesheets, vec!["/main.css"]);
        assert_eq!(result.external_resources.scripts, vec!["/app.js"]);
        assert_eq!(result.external_resources.images, vec!["/logo.png"]);
        // img stays in the tree, link and script do not
        assert_eq!(result.root.children.len(), 1);
        assert_eq!(result.root.children[0].tag_name, "img");
    }

    #[test]
    fn test_lenient_unclosed_and_stray_tags() {
        // Unclosed div folds at end of input; stray </span> is dropped
        let result = parse("<div><p>one</span></p>two").unwrap();

        let div = &result.root.children[0];
        assert_eq!(div.tag_name, "div");
        assert_eq!(div.children[0].tag_name, "p");
        assert_eq!(div.children[0].text_content, "one");
        assert_eq!(div.text_content, "two");
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let result = parse("<div><br><img src=\"a.png\"/><span>after</span></div>").unwrap();

        let div = &result.root.children[0];
        assert_eq!(div.children.len(), 3);
        assert_eq!(div.children[0].tag_name, "br");
        assert_eq!(div.children[1].tag_name, "img");
        assert_eq!(div.children[2].text_content, "after");
    }

    #[test]
    fn test_skips_comments_and_doctype() {
        let result = parse("<!DOCTYPE html><!-- note --><div>kept</div>").unwrap();
        assert_eq!(result.root.children.len(), 1);
        assert_eq!(result.root.children[0].text_content, "kept");
    }

    #[test]
    fn test_entity_unescaping() {
        let result = parse("<div title=\"a &amp; b\">1 &lt; 2</div>").unwrap();
        let div = &result.root.children[0];
        assert_eq!(div.attributes.get("title"), Some(&"a & b".to_string()));
        assert_eq!(div.text_content, "1 < 2");
    }

    #[test]
    fn test_element_map_indexes_every_node() {
        let result = parse("<div><span>a</span><span>b</span></div>").unwrap();
        // root + div + 2 spans
        assert_eq!(result.element_map.len(), 4);
        assert_eq!(result.root.node_count(), 4);
    }

    #[test]
    fn test_identifiers_stable_for_same_markup() {
        let first = parse("<div><span>x</span></div>").unwrap();
        let second = parse("<div><span>x</span></div>").unwrap();
        assert_eq!(
            first.root.children[0].identifier,
            second.root.children[0].identifier
        );
    }
}
