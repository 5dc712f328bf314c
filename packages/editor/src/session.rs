//! # Edit Session Management
//!
//! A session owns what the canvas layer supplies: the static html/css/js
//! triple per shape and the append-only override history recorded
//! against it. Overrides are never mutated after recording; a later
//! record with the same selector supersedes earlier ones at merge time.
//!
//! Shape state lives in an explicitly owned [`Registry`], created on
//! first use and deleted when the owning shape is removed.

use crate::applicator::Applicator;
use crate::errors::EditorError;
use crate::merge::merge_overrides;
use crate::overrides::ElementOverride;
use easel_common::Registry;
use serde::{Deserialize, Serialize};

/// Static document content plus its recorded override history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub html: String,
    pub css: String,
    pub js: String,
    pub overrides: Vec<ElementOverride>,
}

/// Single edit session over one canvas of shapes
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    shapes: Registry<ShapeDocument>,
    applicator: Applicator,
}

impl EditSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shapes: Registry::new(),
            applicator: Applicator::new(),
        }
    }

    /// Register a shape's static content, creating its entry on first use
    pub fn open_shape(
        &mut self,
        shape_id: &str,
        html: impl Into<String>,
        css: impl Into<String>,
        js: impl Into<String>,
    ) {
        let shape = self.shapes.get_or_insert_with(shape_id, ShapeDocument::default);
        shape.html = html.into();
        shape.css = css.into();
        shape.js = js.into();
    }

    /// Append an override to a shape's history
    pub fn record(
        &mut self,
        shape_id: &str,
        record: ElementOverride,
    ) -> Result<(), EditorError> {
        let shape = self
            .shapes
            .get_mut(shape_id)
            .ok_or_else(|| EditorError::UnknownShape(shape_id.to_string()))?;
        shape.overrides.push(record);
        Ok(())
    }

    /// Full recorded history for a shape
    pub fn overrides(&self, shape_id: &str) -> Option<&[ElementOverride]> {
        self.shapes
            .get(shape_id)
            .map(|shape| shape.overrides.as_slice())
    }

    /// Effective (merged) override set for a shape
    pub fn merged(&self, shape_id: &str) -> Vec<ElementOverride> {
        self.shapes
            .get(shape_id)
            .map(|shape| merge_overrides(&shape.overrides))
            .unwrap_or_default()
    }

    /// Re-derive the shape's current markup from its pristine source
    pub fn preview(&self, shape_id: &str) -> Result<String, EditorError> {
        let shape = self
            .shapes
            .get(shape_id)
            .ok_or_else(|| EditorError::UnknownShape(shape_id.to_string()))?;
        self.applicator.apply(&shape.html, &shape.overrides)
    }

    pub fn shape(&self, shape_id: &str) -> Option<&ShapeDocument> {
        self.shapes.get(shape_id)
    }

    /// Drop a shape and its history when its owner goes away
    pub fn remove_shape(&mut self, shape_id: &str) -> bool {
        self.shapes.delete(shape_id).is_some()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}
