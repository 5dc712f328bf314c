//! # Override Application
//!
//! Re-derives final markup by replaying an override history over the
//! pristine source. The history is merged first, so applying the same
//! set in any order produces identical output.

use crate::dom_host::DomHost;
use crate::errors::EditorError;
use crate::merge::merge_overrides;
use crate::overrides::ElementOverride;
use crate::style_codec::{decode, to_hyphenated};
use easel_parser::{HtmlParser, ParsedElement};
use tracing::{debug, warn};

pub struct Applicator<H: DomHost = HtmlParser> {
    host: H,
}

impl Applicator<HtmlParser> {
    pub fn new() -> Self {
        Self {
            host: HtmlParser::new(),
        }
    }
}

impl Default for Applicator<HtmlParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: DomHost> Applicator<H> {
    /// Build an applicator over a custom host implementation
    pub fn with_host(host: H) -> Self {
        Self { host }
    }

    /// Apply `overrides` to `markup` and return the resulting markup.
    ///
    /// Empty markup or an empty override list returns the input
    /// unchanged. A bad override (invalid selector, unparseable
    /// replacement markup) is logged and skipped; only an unparseable
    /// baseline propagates an error.
    pub fn apply(
        &self,
        markup: &str,
        overrides: &[ElementOverride],
    ) -> Result<String, EditorError> {
        if markup.is_empty() || overrides.is_empty() {
            return Ok(markup.to_string());
        }

        let merged = merge_overrides(overrides);
        let mut parsed = self.host.parse(markup)?;

        for record in &merged {
            if let Err(error) = self.apply_one(&mut parsed.root, record) {
                warn!(selector = %record.selector, %error, "Skipping override");
            }
        }

        Ok(self.host.serialize_inner(&parsed.root))
    }

    fn apply_one(
        &self,
        root: &mut ParsedElement,
        record: &ElementOverride,
    ) -> Result<(), EditorError> {
        let identifiers = self.host.query_selector(root, &record.selector)?;
        if identifiers.is_empty() {
            debug!(selector = %record.selector, "Selector matched no nodes");
            return Ok(());
        }

        for identifier in identifiers {
            // A node can disappear mid-loop when an earlier match's html
            // replacement swallowed it
            let Some(node) = root.find_mut(&identifier) else {
                continue;
            };
            self.apply_to_node(node, record)?;
        }
        Ok(())
    }

    /// Field order is fixed: text, styles, html, attributes, position,
    /// size. html replacement discards the node's descendants, so when a
    /// merged record carries both text and html, html wins.
    fn apply_to_node(
        &self,
        node: &mut ParsedElement,
        record: &ElementOverride,
    ) -> Result<(), EditorError> {
        if let Some(text) = &record.text {
            node.text_content = text.clone();
            node.children.clear();
        }

        if let Some(styles) = &record.styles {
            for (property, value) in styles {
                node.inline_styles.insert(to_hyphenated(property), value.clone());
            }
        }

        if let Some(html) = &record.html {
            let fragment = self.host.parse(html)?;
            node.text_content = fragment.root.text_content.clone();
            node.children = fragment.root.children.clone();
        }

        if let Some(attributes) = &record.attributes {
            for (name, value) in attributes {
                if name == "style" {
                    // The style attribute lives in inline_styles, not in
                    // the attribute map
                    node.inline_styles = decode(value)
                        .into_iter()
                        .map(|(property, value)| (to_hyphenated(&property), value))
                        .collect();
                } else {
                    node.attributes.insert(name.clone(), value.clone());
                }
            }
        }

        if let Some(position) = record.position {
            let positioning = node.inline_styles.get("position").map(String::as_str);
            if positioning.is_none() || positioning == Some("static") {
                node.inline_styles
                    .insert("position".to_string(), "absolute".to_string());
            }
            node.inline_styles
                .insert("left".to_string(), format!("{}px", position.x));
            node.inline_styles
                .insert("top".to_string(), format!("{}px", position.y));
        }

        if let Some(size) = record.size {
            node.inline_styles
                .insert("width".to_string(), format!("{}px", size.width));
            node.inline_styles
                .insert("height".to_string(), format!("{}px", size.height));
        }

        Ok(())
    }
}
