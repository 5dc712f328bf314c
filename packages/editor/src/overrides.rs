//! # Element Overrides
//!
//! The atomic edit record. Every visual edit (text, style, attribute,
//! move, resize, full-markup replacement) is captured as one
//! `ElementOverride` keyed by a CSS selector, appended to the owning
//! session's history and never mutated afterwards. Later overrides for
//! the same selector supersede earlier ones at merge time.
//!
//! ## Override Semantics
//!
//! ### text / html / position / size
//! - Atomic replacement (not a diff)
//! - Last write wins across the history
//!
//! ### styles / attributes
//! - Shallow map merge across the history; setting `color` later does
//!   not erase an earlier `fontSize`
//!
//! ### original
//! - Snapshot of the pre-edit values for this record's fields, used for
//!   restoration; folded with the same rules, independently of the
//!   top-level fields

use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Absolute pixel offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Pixel box size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Snapshot of pre-edit values, used for undo/restoration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl OriginalValues {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.styles.is_none()
            && self.html.is_none()
            && self.attributes.is_none()
            && self.position.is_none()
            && self.size.is_none()
    }
}

/// One recorded edit against the node(s) a selector addresses.
///
/// Plain data; every field survives a JSON round trip so override
/// histories can be persisted alongside their document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementOverride {
    /// Target selector; matching zero live nodes is a valid outcome
    pub selector: String,

    /// Replacement text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline style properties, camelCase keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<HashMap<String, String>>,

    /// Replacement inner markup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Attributes set verbatim, `data-*` included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    /// Ordering key. Not guaranteed monotonic across records; merge
    /// sorts explicitly.
    pub timestamp: u64,

    /// Provenance flag
    pub ai_generated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<OriginalValues>,

    /// Viewport the edit was authored in; absent means viewport-agnostic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

impl ElementOverride {
    pub fn new(selector: impl Into<String>, timestamp: u64) -> Self {
        Self {
            selector: selector.into(),
            text: None,
            styles: None,
            html: None,
            attributes: None,
            position: None,
            size: None,
            timestamp,
            ai_generated: false,
            original: None,
            viewport: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles
            .get_or_insert_with(HashMap::new)
            .insert(property.into(), value.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    pub fn with_original(mut self, original: OriginalValues) -> Self {
        self.original = Some(original);
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn mark_ai_generated(mut self) -> Self {
        self.ai_generated = true;
        self
    }

    /// Build the override that restores this edit's pre-edit values.
    /// Returns `None` when no `original` snapshot was recorded.
    pub fn to_restore(&self, timestamp: u64) -> Option<ElementOverride> {
        let original = self.original.as_ref()?;
        if original.is_empty() {
            return None;
        }
        Some(ElementOverride {
            selector: self.selector.clone(),
            text: original.text.clone(),
            styles: original.styles.clone(),
            html: original.html.clone(),
            attributes: original.attributes.clone(),
            position: original.position,
            size: original.size,
            timestamp,
            ai_generated: false,
            original: None,
            viewport: self.viewport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_serialization() {
        let edit = ElementOverride::new(".hero", 1000)
            .with_text("Hello")
            .with_style("fontSize", "14px")
            .with_attribute("data-role", "banner")
            .with_position(10.0, 20.0)
            .with_size(300.0, 120.0)
            .mark_ai_generated();

        let json = serde_json::to_string(&edit).unwrap();
        let deserialized: ElementOverride = serde_json::from_str(&json).unwrap();

        assert_eq!(edit, deserialized);
    }

    #[test]
    fn test_serialized_field_names_are_camel_case() {
        let edit = ElementOverride::new(".hero", 1).with_text("x");
        let json = serde_json::to_string(&edit).unwrap();

        assert!(json.contains("\"aiGenerated\":false"));
        assert!(json.contains("\"timestamp\":1"));
        assert!(!json.contains("ai_generated"));
    }

    #[test]
    fn test_original_round_trips() {
        let edit = ElementOverride::new("#btn", 5).with_text("after").with_original(
            OriginalValues {
                text: Some("before".to_string()),
                ..Default::default()
            },
        );

        let json = serde_json::to_value(&edit).unwrap();
        assert_eq!(json["original"]["text"], "before");

        let back: ElementOverride = serde_json::from_value(json).unwrap();
        assert_eq!(back, edit);
    }

    #[test]
    fn test_to_restore_inverts_recorded_fields() {
        let edit = ElementOverride::new(".title", 100)
            .with_text("New title")
            .with_style("color", "red")
            .with_original(OriginalValues {
                text: Some("Old title".to_string()),
                styles: Some(HashMap::from([("color".to_string(), "black".to_string())])),
                ..Default::default()
            });

        let restore = edit.to_restore(200).unwrap();
        assert_eq!(restore.selector, ".title");
        assert_eq!(restore.text.as_deref(), Some("Old title"));
        assert_eq!(
            restore.styles.as_ref().and_then(|s| s.get("color")).map(String::as_str),
            Some("black")
        );
        assert_eq!(restore.timestamp, 200);
        assert!(restore.original.is_none());
    }

    #[test]
    fn test_to_restore_without_snapshot() {
        let edit = ElementOverride::new(".title", 100).with_text("x");
        assert!(edit.to_restore(200).is_none());
    }
}
