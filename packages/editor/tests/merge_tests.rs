//! Merge engine property tests

use easel_editor::{merge_overrides, ElementOverride, OriginalValues};
use std::collections::HashMap;

fn sample_history() -> Vec<ElementOverride> {
    vec![
        ElementOverride::new(".test", 1000).with_text("First"),
        ElementOverride::new(".test", 2000).with_text("Second"),
        ElementOverride::new(".test", 3000)
            .with_style("color", "red")
            .mark_ai_generated(),
        ElementOverride::new("#hero", 1500)
            .with_style("fontSize", "18px")
            .with_attribute("data-state", "open"),
        ElementOverride::new("#hero", 2500).with_style("color", "blue"),
        ElementOverride::new(".aside", 500).with_position(10.0, 20.0).with_size(100.0, 50.0),
    ]
}

/// Index a merged set by selector for order-insensitive comparison
fn by_selector(merged: Vec<ElementOverride>) -> HashMap<String, ElementOverride> {
    merged
        .into_iter()
        .map(|record| (record.selector.clone(), record))
        .collect()
}

#[test]
fn test_concrete_scenario_from_editing_session() {
    let history = vec![
        ElementOverride::new(".test", 1000).with_text("First"),
        ElementOverride::new(".test", 2000).with_text("Second"),
        ElementOverride::new(".test", 3000)
            .with_style("color", "red")
            .mark_ai_generated(),
    ];

    let merged = merge_overrides(&history);
    assert_eq!(merged.len(), 1);

    let record = &merged[0];
    assert_eq!(record.selector, ".test");
    assert_eq!(record.text.as_deref(), Some("Second"));
    assert_eq!(
        record.styles.as_ref().and_then(|s| s.get("color")).map(String::as_str),
        Some("red")
    );
    assert_eq!(record.timestamp, 3000);
    assert!(record.ai_generated);
}

#[test]
fn test_merge_is_idempotent() {
    let once = merge_overrides(&sample_history());
    let twice = merge_overrides(&once);
    assert_eq!(by_selector(once), by_selector(twice));
}

#[test]
fn test_merge_deterministic_under_shuffling() {
    let history = sample_history();
    let baseline = by_selector(merge_overrides(&history));

    // Fixed permutations standing in for arbitrary shuffles
    let permutations: Vec<Vec<usize>> = vec![
        vec![5, 4, 3, 2, 1, 0],
        vec![2, 0, 4, 1, 5, 3],
        vec![3, 5, 0, 2, 4, 1],
        vec![1, 3, 5, 0, 2, 4],
    ];

    for permutation in permutations {
        let shuffled: Vec<ElementOverride> =
            permutation.iter().map(|&i| history[i].clone()).collect();
        assert_eq!(by_selector(merge_overrides(&shuffled)), baseline);
    }
}

#[test]
fn test_map_fields_merge_shallowly() {
    let history = vec![
        ElementOverride::new(".btn", 1).with_style("fontSize", "14px"),
        ElementOverride::new(".btn", 2).with_style("color", "red"),
        ElementOverride::new(".btn", 3).with_style("color", "blue"),
        ElementOverride::new(".btn", 4).with_attribute("data-a", "1"),
        ElementOverride::new(".btn", 5).with_attribute("data-b", "2"),
    ];

    let merged = merge_overrides(&history);
    let styles = merged[0].styles.as_ref().unwrap();
    assert_eq!(styles.get("fontSize").map(String::as_str), Some("14px"));
    assert_eq!(styles.get("color").map(String::as_str), Some("blue"));

    let attributes = merged[0].attributes.as_ref().unwrap();
    assert_eq!(attributes.len(), 2);
}

#[test]
fn test_scalar_fields_take_last_definition() {
    let history = vec![
        ElementOverride::new(".box", 1)
            .with_html("<span>old</span>")
            .with_position(0.0, 0.0),
        ElementOverride::new(".box", 2).with_position(50.0, 60.0),
        ElementOverride::new(".box", 3).with_html("<span>new</span>"),
    ];

    let merged = merge_overrides(&history);
    assert_eq!(merged[0].html.as_deref(), Some("<span>new</span>"));
    let position = merged[0].position.unwrap();
    assert_eq!((position.x, position.y), (50.0, 60.0));
}

#[test]
fn test_original_snapshot_never_misattributed() {
    // The first edit records the true pre-edit text; a later edit that
    // doesn't touch text must not overwrite that snapshot.
    let history = vec![
        ElementOverride::new(".title", 1).with_text("v1").with_original(OriginalValues {
            text: Some("pristine".to_string()),
            ..Default::default()
        }),
        ElementOverride::new(".title", 2).with_text("v2").with_original(OriginalValues {
            styles: Some(HashMap::from([("color".to_string(), "black".to_string())])),
            ..Default::default()
        }),
    ];

    let merged = merge_overrides(&history);
    let original = merged[0].original.as_ref().unwrap();
    assert_eq!(original.text.as_deref(), Some("pristine"));
    assert!(original.styles.is_some());
}

#[test]
fn test_empty_input() {
    assert!(merge_overrides(&[]).is_empty());
}

#[test]
fn test_inputs_are_not_mutated() {
    let history = sample_history();
    let snapshot = history.clone();
    let _ = merge_overrides(&history);
    assert_eq!(history, snapshot);
}
