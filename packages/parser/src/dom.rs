use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Layout bounds measured by the host canvas (optional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Tree node mirroring a markup element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedElement {
    /// Stable key assigned by the parse session's `IdGenerator`
    pub identifier: String,

    pub tag_name: String,

    pub attributes: HashMap<String, String>,

    /// Declarations from the `style` attribute, hyphenated property names
    pub inline_styles: HashMap<String, String>,

    /// Canonical selector assigned to this node at parse time
    pub selector: String,

    /// Direct text content (child element markup lives in `children`)
    pub text_content: String,

    pub children: Vec<ParsedElement>,

    /// Non-owning back-reference to the parent node, by identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl ParsedElement {
    pub fn new(tag_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            inline_styles: HashMap::new(),
            selector: String::new(),
            text_content: String::new(),
            children: Vec::new(),
            parent_id: None,
            bounds: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inline_styles.insert(key.into(), value.into());
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    pub fn with_child(mut self, child: ParsedElement) -> Self {
        self.children.push(child);
        self
    }

    /// Find a node by identifier (depth-first, self included)
    pub fn find(&self, identifier: &str) -> Option<&ParsedElement> {
        if self.identifier == identifier {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find(identifier) {
                return Some(found);
            }
        }
        None
    }

    /// Find a node by identifier for mutation (depth-first, self included)
    pub fn find_mut(&mut self, identifier: &str) -> Option<&mut ParsedElement> {
        if self.identifier == identifier {
            return Some(self);
        }
        for child in &mut self.children {
            if let Some(found) = child.find_mut(identifier) {
                return Some(found);
            }
        }
        None
    }

    /// Find a node by its assigned canonical selector
    pub fn find_by_selector(&self, selector: &str) -> Option<&ParsedElement> {
        if self.selector == selector {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find_by_selector(selector) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every node in the subtree, self included, in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ParsedElement)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}

/// URLs referenced by the document but not inlined
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalResources {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub images: Vec<String>,
}

/// Output of one parse session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlParseResult {
    /// Synthetic `body` root holding the markup's top-level nodes
    pub root: ParsedElement,

    /// Flat identifier index. A lookup accelerator only; the tree under
    /// `root` stays authoritative after mutation.
    pub element_map: HashMap<String, ParsedElement>,

    /// Aggregated `<style>` content
    pub styles: String,

    /// Aggregated inline `<script>` content
    pub scripts: String,

    pub external_resources: ExternalResources,
}

impl HtmlParseResult {
    /// Look up a node by its assigned selector, flat index first with a
    /// tree walk as fallback.
    pub fn lookup_selector(&self, selector: &str) -> Option<&ParsedElement> {
        self.element_map
            .values()
            .find(|el| el.selector == selector)
            .or_else(|| self.root.find_by_selector(selector))
    }
}
