//! Host capability seam.
//!
//! The engine's pure logic never touches a concrete parser directly; it
//! goes through `DomHost`, so the markup/selector machinery can be
//! swapped out (or stubbed in tests) without touching merge/apply
//! semantics. `easel-parser` provides the default implementation.

use easel_parser::{HtmlParseResult, HtmlParser, ParseResult, ParsedElement, SelectorError};

/// Markup-tree capabilities the override engine consumes
pub trait DomHost {
    /// Parse markup into a live, mutable element tree. Must tolerate
    /// malformed markup by auto-correcting rather than failing.
    fn parse(&self, markup: &str) -> ParseResult<HtmlParseResult>;

    /// Serialize a node's inner markup
    fn serialize_inner(&self, element: &ParsedElement) -> String;

    /// Identifiers of the nodes matching `selector`, in document order.
    /// An invalid selector is an error, catchable per call.
    fn query_selector(
        &self,
        root: &ParsedElement,
        selector: &str,
    ) -> Result<Vec<String>, SelectorError>;
}

impl DomHost for HtmlParser {
    fn parse(&self, markup: &str) -> ParseResult<HtmlParseResult> {
        HtmlParser::parse(self, markup)
    }

    fn serialize_inner(&self, element: &ParsedElement) -> String {
        easel_parser::serialize_inner(element)
    }

    fn query_selector(
        &self,
        root: &ParsedElement,
        selector: &str,
    ) -> Result<Vec<String>, SelectorError> {
        let matches = easel_parser::query(root, selector)?;
        Ok(matches
            .into_iter()
            .map(|element| element.identifier.clone())
            .collect())
    }
}
