use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Unterminated tag at {pos}")]
    UnterminatedTag { pos: usize },

    #[error("Invalid markup at {pos}: {message}")]
    InvalidMarkup { pos: usize, message: String },
}

impl ParseError {
    pub fn unterminated_tag(pos: usize) -> Self {
        Self::UnterminatedTag { pos }
    }

    pub fn invalid_markup(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidMarkup {
            pos,
            message: message.into(),
        }
    }
}
