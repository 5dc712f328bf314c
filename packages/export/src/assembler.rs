//! # Export Assembly
//!
//! Turns a parsed baseline plus its override history into downloadable
//! artifacts: either one self-contained document or a separate
//! html/css/js triple. The markup is reconstructed from the baseline
//! tree and run through the applicator, so the export always reflects
//! the effective (merged) edit state.

use easel_editor::{Applicator, EditorError, ElementOverride};
use easel_parser::{serialize_inner, HtmlParseResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Apply error: {0}")]
    Apply(#[from] EditorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One self-contained document with styles and scripts embedded
    Single,
    /// Separate html, css and js artifacts, no document wrapper
    Separate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    pub html: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
}

/// Assemble export artifacts for a baseline and its override history
pub fn export(
    baseline: &HtmlParseResult,
    overrides: &[ElementOverride],
    format: ExportFormat,
) -> Result<ExportResult, ExportError> {
    let markup = serialize_inner(&baseline.root);
    let processed = Applicator::new().apply(&markup, overrides)?;

    match format {
        ExportFormat::Separate => Ok(ExportResult {
            html: processed,
            css: Some(baseline.styles.clone()),
            js: Some(baseline.scripts.clone()),
        }),
        ExportFormat::Single => Ok(ExportResult {
            html: wrap_document(&processed, &baseline.styles, &baseline.scripts),
            css: None,
            js: None,
        }),
    }
}

/// Wrap body markup in a minimal document shell
fn wrap_document(markup: &str, styles: &str, scripts: &str) -> String {
    let mut ctx = Context::new();

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    if !styles.is_empty() {
        ctx.add_line("<style>");
        ctx.add_raw_block(styles);
        ctx.add_line("</style>");
    }
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_raw_block(markup);
    if !scripts.is_empty() {
        ctx.add_line("<script>");
        ctx.add_raw_block(scripts);
        ctx.add_line("</script>");
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

struct Context {
    depth: usize,
    buffer: String,
}

impl Context {
    fn new() -> Self {
        Self {
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add_line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buffer.push_str("  ");
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    /// Multi-line content emitted as-is, one indented line per input line
    fn add_raw_block(&mut self, block: &str) {
        for line in block.lines() {
            self.add_line(line);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}
