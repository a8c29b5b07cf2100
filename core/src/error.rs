/// Errors returned by index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Bad or unknown document id, or forbidden characters in a stop word.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Malformed minus-words, or forbidden characters in query or document text.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, Error>;
