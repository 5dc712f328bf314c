//! # Easel Editor
//!
//! Core override engine for Easel.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup text → element tree          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: override lifecycle                  │
//! │  - Record edits as ElementOverride values   │
//! │  - Collapse history per selector (merge)    │
//! │  - Reapply overrides over pristine markup   │
//! │  - Report changed targets (diff)            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ export / responsive: assembled artifacts    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Source markup stays pristine**: every edit is a replayable record
//! 2. **Merge is the semantics**: last write wins for scalars, shallow
//!    merge for style/attribute maps
//! 3. **Re-derive, never cache**: apply/diff always work from the full
//!    override history, so equal inputs give equal outputs
//! 4. **One bad edit never blocks the rest**: per-override failures are
//!    logged and skipped inside the apply loop
//!
//! ## Usage
//!
//! ```rust,ignore
//! use easel_editor::{Applicator, ElementOverride};
//!
//! let edit = ElementOverride::new(".title", 1000).with_text("Hello");
//! let output = Applicator::new().apply(markup, &[edit])?;
//! ```

mod applicator;
mod differ;
mod dom_host;
mod errors;
mod merge;
mod overrides;
mod session;
mod style_codec;
mod viewport;

pub use applicator::Applicator;
pub use differ::{diff_markup, HtmlDiff, ModifiedElement};
pub use dom_host::DomHost;
pub use errors::EditorError;
pub use merge::merge_overrides;
pub use overrides::{ElementOverride, OriginalValues, Position, Size};
pub use session::{EditSession, ShapeDocument};
pub use style_codec::{decode, encode, merge_styles, to_camel_case, to_hyphenated};
pub use viewport::{Viewport, ViewportPreset};

// Re-export common types for convenience
pub use easel_parser::{HtmlParseResult, ParsedElement};
