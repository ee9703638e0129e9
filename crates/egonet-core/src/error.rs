pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("GEDCOM parse error (line {line}): {message}")]
    Gedcom { line: usize, message: String },

    #[error("GEDCOM input is not valid UTF-8: {message}")]
    InvalidEncoding { message: String },

    #[error("Person not found")]
    PersonNotFound { id: String },
}
