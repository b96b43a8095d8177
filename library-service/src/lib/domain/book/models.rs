use std::fmt;

use chrono::NaiveDate;

use crate::domain::book::errors::BookIdError;
use crate::domain::book::errors::BookTextError;
use crate::domain::book::errors::IsbnError;
use crate::domain::book::errors::ReleaseDateError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Book aggregate entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub isbn: Isbn,
    pub title: Title,
    pub author: Author,
    pub release_date: NaiveDate,
    /// String form of the registering user's id. Weak reference: the user
    /// may no longer exist.
    pub registered_by: String,
}

impl Book {
    /// Registering user's id, if the stored reference is still a valid id.
    pub fn registrant_id(&self) -> Option<UserId> {
        UserId::from_string(&self.registered_by).ok()
    }
}

/// Book unique identifier, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(pub i64);

impl BookId {
    /// Parse a book ID from its string form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, BookIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(BookId(id)),
            _ => Err(BookIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ISBN value type
///
/// Letters and digits only, exactly the configured number of characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(isbn: String, expected_length: usize) -> Result<Self, IsbnError> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(IsbnError::Empty);
        }
        if !isbn.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IsbnError::InvalidCharacters);
        }
        if isbn.len() != expected_length {
            return Err(IsbnError::WrongLength {
                expected: expected_length,
                actual: isbn.len(),
            });
        }
        Ok(Self(isbn.to_string()))
    }

    /// Rebuild from a value the store already accepted.
    pub(crate) fn from_trusted(isbn: String) -> Self {
        Self(isbn)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

const MAX_TEXT_LENGTH: usize = 255;

fn bounded_text(field: &'static str, value: String) -> Result<String, BookTextError> {
    let value = value.trim();
    let length = value.chars().count();

    if length == 0 {
        Err(BookTextError::Empty { field })
    } else if length > MAX_TEXT_LENGTH {
        Err(BookTextError::TooLong {
            field,
            max: MAX_TEXT_LENGTH,
            actual: length,
        })
    } else {
        Ok(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn new(title: String) -> Result<Self, BookTextError> {
        bounded_text("Title", title).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(String);

impl Author {
    pub fn new(author: String) -> Result<Self, BookTextError> {
        bounded_text("Author", author).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse an ISO `YYYY-MM-DD` release date.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, ReleaseDateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ReleaseDateError::Empty);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ReleaseDateError::InvalidFormat(raw.to_string()))
}

/// Command to add a book to the catalog with domain types
#[derive(Debug, Clone)]
pub struct CreateBookCommand {
    pub isbn: Isbn,
    pub title: Title,
    pub author: Author,
    pub release_date: NaiveDate,
}

/// A validated book not yet stored; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub isbn: Isbn,
    pub title: Title,
    pub author: Author,
    pub release_date: NaiveDate,
    pub registered_by: String,
}

impl NewBook {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            release_date: self.release_date,
            registered_by: self.registered_by,
        }
    }
}

/// Public summary of the user who registered a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for Registrant {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// A book as shown in the catalog listing.
///
/// `registered_by_user` is `None` when the registering user cannot be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub book: Book,
    pub registered_by_user: Option<Registrant>,
}
