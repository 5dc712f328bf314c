//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] easel_parser::ParseError),

    #[error("Selector error: {0}")]
    Selector(#[from] easel_parser::SelectorError),

    #[error("Unknown shape: {0}")]
    UnknownShape(String),
}
