pub mod dom;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod selector;
pub mod serializer;

pub use dom::{Bounds, ExternalResources, HtmlParseResult, ParsedElement};
pub use error::{ParseError, ParseResult};
pub use id_generator::{get_document_id, IdGenerator};
pub use parser::{parse, HtmlParser};
pub use selector::{matches_unique, query, SelectorError};
pub use serializer::{serialize_element, serialize_inner};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let result = parse("<div class=\"hero\">Hello</div>").unwrap();
        assert_eq!(result.root.children.len(), 1);
        assert_eq!(result.root.children[0].tag_name, "div");
    }
}
