//! Selector generation and matching.
//!
//! Covers the selector surface the editor actually produces and resolves:
//! tag, `#id`, `.class`, `[attr]` / `[attr=value]`, `:nth-of-type(n)`,
//! compounds of those, and descendant / child combinators. Anything
//! outside that surface is an [`SelectorError`], reported per call so a
//! caller can skip one bad selector without aborting the rest.

use crate::dom::ParsedElement;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Invalid selector `{selector}`: {message}")]
    Invalid { selector: String, message: String },
}

impl SelectorError {
    fn invalid(selector: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            selector: selector.to_string(),
            message: message.into(),
        }
    }
}

/// One simple-selector group, e.g. `div.card:nth-of-type(2)`
#[derive(Debug, Clone, Default, PartialEq)]
struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
    nth_of_type: Option<usize>,
}

impl CompoundSelector {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.nth_of_type.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

/// A full selector: compounds joined by combinators, right-most last
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    combinators: Vec<Combinator>,
}

/// Find every node in `root`'s subtree matching `selector`, in document
/// order. Zero matches is a valid outcome, not an error.
pub fn query<'a>(
    root: &'a ParsedElement,
    selector: &str,
) -> Result<Vec<&'a ParsedElement>, SelectorError> {
    let complexes = parse_selector(selector)?;

    let mut out: Vec<&ParsedElement> = Vec::new();
    let mut path: Vec<(&ParsedElement, usize)> = Vec::new();
    collect_matches(root, 1, &complexes, &mut path, &mut out);
    Ok(out)
}

/// Validate that `selector` resolves to exactly one node
pub fn matches_unique(root: &ParsedElement, selector: &str) -> Result<bool, SelectorError> {
    Ok(query(root, selector)?.len() == 1)
}

fn collect_matches<'a>(
    element: &'a ParsedElement,
    type_index: usize,
    complexes: &[ComplexSelector],
    path: &mut Vec<(&'a ParsedElement, usize)>,
    out: &mut Vec<&'a ParsedElement>,
) {
    path.push((element, type_index));

    let already_matched = out.iter().any(|el| el.identifier == element.identifier);
    if !already_matched && complexes.iter().any(|sel| complex_matches(sel, path)) {
        out.push(element);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for child in &element.children {
        let ordinal = seen.entry(child.tag_name.as_str()).or_insert(0);
        *ordinal += 1;
        collect_matches(child, *ordinal, complexes, path, out);
    }

    path.pop();
}

fn complex_matches(selector: &ComplexSelector, path: &[(&ParsedElement, usize)]) -> bool {
    if path.is_empty() {
        return false;
    }
    matches_at(
        selector,
        selector.compounds.len() - 1,
        path,
        path.len() - 1,
    )
}

fn matches_at(
    selector: &ComplexSelector,
    compound_idx: usize,
    path: &[(&ParsedElement, usize)],
    path_idx: usize,
) -> bool {
    let (element, type_index) = path[path_idx];
    if !compound_matches(&selector.compounds[compound_idx], element, type_index) {
        return false;
    }
    if compound_idx == 0 {
        return true;
    }
    match selector.combinators[compound_idx - 1] {
        Combinator::Child => {
            path_idx > 0 && matches_at(selector, compound_idx - 1, path, path_idx - 1)
        }
        Combinator::Descendant => (0..path_idx)
            .rev()
            .any(|ancestor| matches_at(selector, compound_idx - 1, path, ancestor)),
    }
}

fn compound_matches(
    compound: &CompoundSelector,
    element: &ParsedElement,
    type_index: usize,
) -> bool {
    if let Some(tag) = &compound.tag {
        if tag != "*" && tag != &element.tag_name {
            return false;
        }
    }

    if let Some(id) = &compound.id {
        if element.attributes.get("id") != Some(id) {
            return false;
        }
    }

    if !compound.classes.is_empty() {
        let class_attr = element.attributes.get("class").map(String::as_str).unwrap_or("");
        let classes: Vec<&str> = class_attr.split_whitespace().collect();
        if !compound.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
    }

    for (name, expected) in &compound.attributes {
        match (element.attributes.get(name), expected) {
            (None, _) => return false,
            (Some(_), None) => {}
            (Some(actual), Some(expected)) => {
                if actual != expected {
                    return false;
                }
            }
        }
    }

    if let Some(nth) = compound.nth_of_type {
        if nth != type_index {
            return false;
        }
    }

    true
}

fn parse_selector(selector: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    if selector.trim().is_empty() {
        return Err(SelectorError::Empty);
    }

    selector
        .split(',')
        .map(|part| parse_complex(selector, part.trim()))
        .collect()
}

fn parse_complex(original: &str, input: &str) -> Result<ComplexSelector, SelectorError> {
    if input.is_empty() {
        return Err(SelectorError::invalid(original, "empty selector group"));
    }

    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut current = CompoundSelector::default();
    let mut pending: Option<Combinator> = None;

    let chars: Vec<char> = input.chars().collect();
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];
        match ch {
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    finish_compound(
                        original,
                        &mut compounds,
                        &mut combinators,
                        &mut current,
                        &mut pending,
                    )?;
                    if pending.is_none() {
                        pending = Some(Combinator::Descendant);
                    }
                }
                idx += 1;
            }
            '>' => {
                if !current.is_empty() {
                    finish_compound(
                        original,
                        &mut compounds,
                        &mut combinators,
                        &mut current,
                        &mut pending,
                    )?;
                }
                if compounds.is_empty() {
                    return Err(SelectorError::invalid(original, "leading combinator"));
                }
                pending = Some(Combinator::Child);
                idx += 1;
            }
            '#' => {
                let (ident, next) = read_identifier(&chars, idx + 1);
                if ident.is_empty() {
                    return Err(SelectorError::invalid(original, "empty id"));
                }
                current.id = Some(ident);
                idx = next;
            }
            '.' => {
                let (ident, next) = read_identifier(&chars, idx + 1);
                if ident.is_empty() {
                    return Err(SelectorError::invalid(original, "empty class"));
                }
                current.classes.push(ident);
                idx = next;
            }
            '[' => {
                let close = chars[idx..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|offset| idx + offset)
                    .ok_or_else(|| SelectorError::invalid(original, "unclosed attribute"))?;
                let body: String = chars[idx + 1..close].iter().collect();
                if body.trim().is_empty() {
                    return Err(SelectorError::invalid(original, "empty attribute"));
                }
                match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches('"').trim_matches('\'');
                        current
                            .attributes
                            .push((name.trim().to_string(), Some(value.to_string())));
                    }
                    None => current.attributes.push((body.trim().to_string(), None)),
                }
                idx = close + 1;
            }
            ':' => {
                let (name, next) = read_identifier(&chars, idx + 1);
                if name != "nth-of-type" {
                    return Err(SelectorError::invalid(
                        original,
                        format!("unsupported pseudo-class `:{name}`"),
                    ));
                }
                if chars.get(next).copied() != Some('(') {
                    return Err(SelectorError::invalid(original, "expected `(` after :nth-of-type"));
                }
                let close = chars[next..]
                    .iter()
                    .position(|c| *c == ')')
                    .map(|offset| next + offset)
                    .ok_or_else(|| SelectorError::invalid(original, "unclosed :nth-of-type"))?;
                let digits: String = chars[next + 1..close].iter().collect();
                let nth: usize = digits
                    .trim()
                    .parse()
                    .map_err(|_| SelectorError::invalid(original, "non-numeric :nth-of-type"))?;
                current.nth_of_type = Some(nth);
                idx = close + 1;
            }
            '*' => {
                current.tag = Some("*".to_string());
                idx += 1;
            }
            c if is_identifier_char(c) => {
                let (ident, next) = read_identifier(&chars, idx);
                current.tag = Some(ident.to_ascii_lowercase());
                idx = next;
            }
            other => {
                return Err(SelectorError::invalid(
                    original,
                    format!("unexpected character `{other}`"),
                ));
            }
        }
    }

    if !current.is_empty() {
        finish_compound(
            original,
            &mut compounds,
            &mut combinators,
            &mut current,
            &mut pending,
        )?;
    }

    if compounds.is_empty() {
        return Err(SelectorError::invalid(original, "no simple selectors"));
    }
    if pending.is_some() {
        return Err(SelectorError::invalid(original, "trailing combinator"));
    }

    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn finish_compound(
    original: &str,
    compounds: &mut Vec<CompoundSelector>,
    combinators: &mut Vec<Combinator>,
    current: &mut CompoundSelector,
    pending: &mut Option<Combinator>,
) -> Result<(), SelectorError> {
    if current.is_empty() {
        return Err(SelectorError::invalid(original, "empty compound"));
    }
    if !compounds.is_empty() {
        combinators.push(pending.take().unwrap_or(Combinator::Descendant));
    } else {
        pending.take();
    }
    compounds.push(std::mem::take(current));
    Ok(())
}

fn read_identifier(chars: &[char], start: usize) -> (String, usize) {
    let mut idx = start;
    while idx < chars.len() && is_identifier_char(chars[idx]) {
        idx += 1;
    }
    (chars[start..idx].iter().collect(), idx)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Assign every node its canonical selector and parent back-reference.
///
/// An element with an `id` attribute gets `#id`; otherwise the selector
/// is the parent chain joined with `>`, each segment `tag.classes` with
/// `:nth-of-type(n)` added when same-tag siblings make it ambiguous.
/// Children of the synthetic root omit the `body` prefix.
pub(crate) fn assign_selectors(root: &mut ParsedElement) {
    root.selector = root.tag_name.clone();
    root.parent_id = None;
    assign_children(root, true);
}

fn assign_children(parent: &mut ParsedElement, parent_is_root: bool) {
    let parent_selector = parent.selector.clone();
    let parent_identifier = parent.identifier.clone();

    let mut tag_totals: HashMap<String, usize> = HashMap::new();
    for child in &parent.children {
        *tag_totals.entry(child.tag_name.clone()).or_insert(0) += 1;
    }

    let mut tag_seen: HashMap<String, usize> = HashMap::new();
    for child in &mut parent.children {
        let ordinal = {
            let count = tag_seen.entry(child.tag_name.clone()).or_insert(0);
            *count += 1;
            *count
        };

        child.parent_id = Some(parent_identifier.clone());
        child.selector = match child.attributes.get("id") {
            Some(id) => format!("#{id}"),
            None => {
                let mut segment = child.tag_name.clone();
                if let Some(class_attr) = child.attributes.get("class") {
                    for class in class_attr.split_whitespace() {
                        segment.push('.');
                        segment.push_str(class);
                    }
                }
                if tag_totals.get(&child.tag_name).copied().unwrap_or(0) > 1 {
                    segment.push_str(&format!(":nth-of-type({ordinal})"));
                }
                if parent_is_root {
                    segment
                } else {
                    format!("{parent_selector} > {segment}")
                }
            }
        };

        assign_children(child, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_query_by_class() {
        let result = parse("<div class=\"test\">a</div><div class=\"other\">b</div>").unwrap();
        let matches = query(&result.root, ".test").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text_content, "a");
    }

    #[test]
    fn test_query_by_id_and_tag() {
        let result = parse("<div id=\"hero\"><span>x</span><span>y</span></div>").unwrap();

        assert_eq!(query(&result.root, "#hero").unwrap().len(), 1);
        assert_eq!(query(&result.root, "span").unwrap().len(), 2);
        assert_eq!(query(&result.root, "div span").unwrap().len(), 2);
        assert_eq!(query(&result.root, "#hero > span").unwrap().len(), 2);
    }

    #[test]
    fn test_query_compound_and_nth() {
        let result = parse(
            "<ul><li class=\"item\">1</li><li class=\"item sel\">2</li><li>3</li></ul>",
        )
        .unwrap();

        assert_eq!(query(&result.root, "li.item").unwrap().len(), 2);
        assert_eq!(query(&result.root, "li.item.sel").unwrap().len(), 1);

        let second = query(&result.root, "li:nth-of-type(2)").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].text_content, "2");
    }

    #[test]
    fn test_query_attribute_selectors() {
        let result =
            parse("<a href=\"/one\">one</a><a href=\"/two\" data-x=\"1\">two</a>").unwrap();

        assert_eq!(query(&result.root, "a[href]").unwrap().len(), 2);
        assert_eq!(query(&result.root, "a[href=/two]").unwrap().len(), 1);
        assert_eq!(query(&result.root, "[data-x]").unwrap().len(), 1);
    }

    #[test]
    fn test_query_zero_matches_is_ok() {
        let result = parse("<div>x</div>").unwrap();
        assert!(query(&result.root, ".missing").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selectors_are_errors() {
        let result = parse("<div>x</div>").unwrap();

        assert!(matches!(query(&result.root, ""), Err(SelectorError::Empty)));
        assert!(query(&result.root, ".").is_err());
        assert!(query(&result.root, "div > ").is_err());
        assert!(query(&result.root, "div:hover").is_err());
        assert!(query(&result.root, "div {").is_err());
    }

    #[test]
    fn test_assigned_selectors_resolve_to_their_node() {
        let result = parse(
            "<div class=\"card\"><h2>t</h2><p>a</p><p>b</p></div><div id=\"foot\">f</div>",
        )
        .unwrap();

        let mut selectors = Vec::new();
        result.root.walk(&mut |el| {
            if el.parent_id.is_some() {
                selectors.push((el.identifier.clone(), el.selector.clone()));
            }
        });

        for (identifier, selector) in selectors {
            let matches = query(&result.root, &selector).unwrap();
            assert_eq!(matches.len(), 1, "selector {selector} should be unique");
            assert_eq!(matches[0].identifier, identifier);
            assert!(matches_unique(&result.root, &selector).unwrap());
        }
    }

    #[test]
    fn test_selector_generation_shapes() {
        let result = parse(
            "<div id=\"top\">x</div><div class=\"card\"><p>a</p><p>b</p></div>",
        )
        .unwrap();

        assert_eq!(result.root.children[0].selector, "#top");
        assert_eq!(result.root.children[1].selector, "div.card:nth-of-type(2)");
        assert_eq!(
            result.root.children[1].children[1].selector,
            "div.card:nth-of-type(2) > p:nth-of-type(2)"
        );
    }
}
