//! # Override Diffing
//!
//! Reports which baseline targets an override history touches. The
//! override model only mutates existing nodes, so `added` and `removed`
//! stay empty; structural diffs would be a different algorithm (tree
//! alignment), not an extension of this one.

use crate::merge::merge_overrides;
use crate::overrides::ElementOverride;
use easel_parser::{query, HtmlParseResult, ParsedElement};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedElement {
    pub selector: String,
    pub changes: ElementOverride,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HtmlDiff {
    pub added: Vec<ParsedElement>,
    pub modified: Vec<ModifiedElement>,
    pub removed: Vec<ParsedElement>,
}

impl HtmlDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Compute the diff of `overrides` against a parsed baseline.
///
/// Each merged selector that resolves in the baseline contributes
/// exactly one `modified` entry. Selectors that resolve nowhere (or are
/// invalid) are silently excluded.
pub fn diff_markup(baseline: &HtmlParseResult, overrides: &[ElementOverride]) -> HtmlDiff {
    let mut diff = HtmlDiff::default();
    if overrides.is_empty() {
        return diff;
    }

    for merged in merge_overrides(overrides) {
        let found = baseline.lookup_selector(&merged.selector).is_some()
            || query(&baseline.root, &merged.selector)
                .map(|matches| !matches.is_empty())
                .unwrap_or(false);

        if found {
            diff.modified.push(ModifiedElement {
                selector: merged.selector.clone(),
                changes: merged,
            });
        }
    }

    diff
}
