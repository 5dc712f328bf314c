//! # Responsive CSS Generation
//!
//! Groups an override history by the viewport each record was authored
//! in and emits a desktop-first `@media` cascade from the grouped style
//! maps. Also rescales a container width proportionally when the active
//! viewport changes.

use easel_editor::{to_hyphenated, ElementOverride, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Overrides authored under one viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportGroup {
    pub viewport: Viewport,
    pub overrides: Vec<ElementOverride>,
}

/// Partition overrides by viewport key. Records without viewport
/// metadata are viewport-agnostic and belong to no group.
pub fn group_by_viewport(overrides: &[ElementOverride]) -> Vec<ViewportGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, ViewportGroup> = HashMap::new();

    for record in overrides {
        let Some(viewport) = record.viewport else {
            continue;
        };
        let key = viewport.key();
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            ViewportGroup {
                viewport,
                overrides: Vec::new(),
            }
        });
        group.overrides.push(record.clone());
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect()
}

/// Emit a desktop-first `@media (max-width: …)` cascade for every
/// override that carries viewport metadata and a non-empty style map.
/// Empty input yields an empty string.
pub fn generate_media_queries(overrides: &[ElementOverride]) -> String {
    let mut groups = group_by_viewport(overrides);
    groups.sort_by(|a, b| b.viewport.width().cmp(&a.viewport.width()));

    let mut css = String::new();
    for group in groups {
        let rules: Vec<String> = group
            .overrides
            .iter()
            .filter_map(format_rule)
            .collect();
        if rules.is_empty() {
            continue;
        }

        css.push_str(&format!(
            "@media (max-width: {}px) {{\n",
            group.viewport.width()
        ));
        for rule in rules {
            css.push_str(&rule);
        }
        css.push_str("}\n\n");
    }

    css
}

fn format_rule(record: &ElementOverride) -> Option<String> {
    let styles = record.styles.as_ref()?;
    if styles.is_empty() {
        return None;
    }

    let mut properties: Vec<&String> = styles.keys().collect();
    properties.sort();

    let mut rule = format!("  {} {{\n", record.selector);
    for property in properties {
        rule.push_str(&format!(
            "    {}: {};\n",
            to_hyphenated(property),
            styles[property]
        ));
    }
    rule.push_str("  }\n");
    Some(rule)
}

/// Proportionally rescale a container width between viewports
pub fn adjust_width(current_width: f64, from: &Viewport, to: &Viewport) -> f64 {
    (current_width * f64::from(to.width()) / f64::from(from.width())).round()
}
