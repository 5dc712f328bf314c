//! Bidirectional conversion between CSS declaration text and property
//! maps. Property maps carry camelCase keys; declaration text carries
//! hyphenated names.

use std::collections::HashMap;

/// `font-size` → `fontSize`
pub fn to_camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;
    for ch in property.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `fontSize` → `font-size`
pub fn to_hyphenated(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Parse declaration text into a property map. Declarations without a
/// colon or with an empty side are dropped; empty input is an empty map.
pub fn decode(css: &str) -> HashMap<String, String> {
    let mut styles = HashMap::new();
    for declaration in css.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }
        styles.insert(to_camel_case(property), value.to_string());
    }
    styles
}

/// Emit declaration text from a property map. Entries with empty values
/// are skipped; keys are emitted in sorted order so equal maps encode to
/// equal strings.
pub fn encode(styles: &HashMap<String, String>) -> String {
    let mut properties: Vec<&String> = styles
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(property, _)| property)
        .collect();
    properties.sort();

    properties
        .iter()
        .map(|property| format!("{}: {};", to_hyphenated(property), styles[*property]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Left-to-right shallow merge; later maps win, `None` reads as empty
pub fn merge_styles(maps: &[Option<&HashMap<String, String>>]) -> HashMap<String, String> {
    let mut merged = HashMap::new();
    for map in maps.iter().flatten() {
        for (property, value) in *map {
            merged.insert(property.clone(), value.clone());
        }
    }
    merged
}
