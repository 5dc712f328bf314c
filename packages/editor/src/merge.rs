//! # Override Merging
//!
//! Collapses an override history into one effective override per
//! selector. The fold is the contract:
//!
//! - scalars (`text`, `html`, `position`, `size`): last definition wins
//! - maps (`styles`, `attributes`): shallow merge, later keys win
//! - `original.*`: folded with the same rules, independently of the
//!   top-level fields, so a restoration snapshot never gets attributed
//!   to the wrong edit
//! - merged `timestamp` is the group maximum; `ai_generated` is the OR
//!   of the group's flags
//!
//! Records sort by timestamp before folding; the sort is stable, so two
//! records sharing a timestamp keep their recorded order. Inputs are
//! never mutated and the result is idempotent under re-merging.

use crate::overrides::{ElementOverride, OriginalValues};
use std::collections::HashMap;

/// Collapse `overrides` to one record per distinct selector. Output
/// order follows first appearance of each selector, but callers must
/// not rely on it.
pub fn merge_overrides(overrides: &[ElementOverride]) -> Vec<ElementOverride> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ElementOverride>> = HashMap::new();

    for record in overrides {
        let group = groups.entry(record.selector.as_str()).or_default();
        if group.is_empty() {
            order.push(record.selector.as_str());
        }
        group.push(record);
    }

    order
        .into_iter()
        .filter_map(|selector| groups.get(selector).map(|group| merge_group(selector, group)))
        .collect()
}

fn merge_group(selector: &str, group: &[&ElementOverride]) -> ElementOverride {
    let mut sorted: Vec<&ElementOverride> = group.to_vec();
    sorted.sort_by_key(|record| record.timestamp);

    let mut merged = ElementOverride::new(
        selector,
        sorted.iter().map(|record| record.timestamp).max().unwrap_or(0),
    );
    merged.ai_generated = sorted.iter().any(|record| record.ai_generated);
    merged.viewport = sorted.iter().rev().find_map(|record| record.viewport);

    for record in sorted {
        fold(&mut merged, record);
    }
    merged
}

fn fold(merged: &mut ElementOverride, next: &ElementOverride) {
    if let Some(text) = &next.text {
        merged.text = Some(text.clone());
    }
    if let Some(html) = &next.html {
        merged.html = Some(html.clone());
    }
    if let Some(position) = next.position {
        merged.position = Some(position);
    }
    if let Some(size) = next.size {
        merged.size = Some(size);
    }
    if let Some(styles) = &next.styles {
        merge_map(&mut merged.styles, styles);
    }
    if let Some(attributes) = &next.attributes {
        merge_map(&mut merged.attributes, attributes);
    }
    if let Some(original) = &next.original {
        fold_original(merged.original.get_or_insert_with(Default::default), original);
    }
}

fn fold_original(merged: &mut OriginalValues, next: &OriginalValues) {
    if let Some(text) = &next.text {
        merged.text = Some(text.clone());
    }
    if let Some(html) = &next.html {
        merged.html = Some(html.clone());
    }
    if let Some(position) = next.position {
        merged.position = Some(position);
    }
    if let Some(size) = next.size {
        merged.size = Some(size);
    }
    if let Some(styles) = &next.styles {
        merge_map(&mut merged.styles, styles);
    }
    if let Some(attributes) = &next.attributes {
        merge_map(&mut merged.attributes, attributes);
    }
}

fn merge_map(slot: &mut Option<HashMap<String, String>>, incoming: &HashMap<String, String>) {
    let map = slot.get_or_insert_with(HashMap::new);
    for (key, value) in incoming {
        map.insert(key.clone(), value.clone());
    }
}
