use thiserror::Error;

/// Error for BookId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookIdError {
    #[error("Invalid book id: {0}")]
    InvalidFormat(String),
}

/// Error for Isbn validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IsbnError {
    #[error("ISBN is required")]
    Empty,

    #[error("ISBN must be exactly {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("ISBN may only contain letters and digits")]
    InvalidCharacters,
}

/// Error for title and author validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookTextError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Error for release date parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReleaseDateError {
    #[error("Release date is required")]
    Empty,

    #[error("Release date must be formatted YYYY-MM-DD, got {0:?}")]
    InvalidFormat(String),
}

/// Top-level error for all book-related operations
#[derive(Debug, Clone, Error)]
pub enum BookError {
    // Value object validation errors
    #[error("Invalid book ID: {0}")]
    InvalidBookId(#[from] BookIdError),

    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(#[from] IsbnError),

    #[error("Invalid book: {0}")]
    InvalidText(#[from] BookTextError),

    #[error("Invalid release date: {0}")]
    InvalidReleaseDate(#[from] ReleaseDateError),

    // Domain-level errors
    #[error("ISBN already registered: {0}")]
    IsbnAlreadyExists(String),

    #[error("Book not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for BookError {
    fn from(err: anyhow::Error) -> Self {
        BookError::Unknown(err.to_string())
    }
}
