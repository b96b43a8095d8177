use async_trait::async_trait;

use crate::domain::book::errors::BookError;
use crate::domain::book::models::Book;
use crate::domain::book::models::BookId;
use crate::domain::book::models::CatalogEntry;
use crate::domain::book::models::CreateBookCommand;
use crate::domain::book::models::NewBook;
use crate::domain::user::models::UserId;

/// Port for catalog operations.
#[async_trait]
pub trait BookServicePort: Send + Sync + 'static {
    /// List every book in insertion order.
    ///
    /// Each entry carries a best-effort summary of the registering user;
    /// it is absent when that user cannot be found.
    ///
    /// # Errors
    /// * `DatabaseError` - Reading the books failed
    async fn list_books(&self) -> Result<Vec<CatalogEntry>, BookError>;

    /// Add a book on behalf of an authenticated user.
    ///
    /// # Arguments
    /// * `command` - Validated book fields
    /// * `registered_by` - Identity established by the auth guard
    ///
    /// # Errors
    /// * `IsbnAlreadyExists` - Another book already has this ISBN
    /// * `DatabaseError` - Database operation failed
    async fn create_book(
        &self,
        command: CreateBookCommand,
        registered_by: UserId,
    ) -> Result<Book, BookError>;

    /// Remove a book.
    ///
    /// # Errors
    /// * `NotFound` - No book has this id
    /// * `DatabaseError` - Database operation failed
    async fn delete_book(&self, id: &BookId) -> Result<(), BookError>;
}

/// Persistence operations for the book aggregate.
#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    /// Persist a new book and assign its id.
    ///
    /// ISBN uniqueness must be enforced by the store itself, atomically with
    /// the insert, so that concurrent creates of one ISBN yield exactly one
    /// success.
    ///
    /// # Errors
    /// * `IsbnAlreadyExists` - Another book already has this ISBN
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, book: NewBook) -> Result<Book, BookError>;

    /// Retrieve all books ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<Book>, BookError>;

    /// Remove a book.
    ///
    /// # Errors
    /// * `NotFound` - No book has this id
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &BookId) -> Result<(), BookError>;
}
