use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::book::errors::BookError;
use crate::domain::book::models::Book;
use crate::domain::book::models::BookId;
use crate::domain::book::models::CatalogEntry;
use crate::domain::book::models::CreateBookCommand;
use crate::domain::book::models::NewBook;
use crate::domain::book::models::Registrant;
use crate::domain::book::ports::BookRepository;
use crate::domain::book::ports::BookServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for catalog operations.
pub struct BookService<BR, UR>
where
    BR: BookRepository,
    UR: UserRepository,
{
    books: Arc<BR>,
    users: Arc<UR>,
}

impl<BR, UR> BookService<BR, UR>
where
    BR: BookRepository,
    UR: UserRepository,
{
    /// Create a new book service with injected dependencies.
    ///
    /// # Arguments
    /// * `books` - Book persistence implementation
    /// * `users` - User lookup used to describe who registered each book
    pub fn new(books: Arc<BR>, users: Arc<UR>) -> Self {
        Self { books, users }
    }

    /// Resolve registrants for `books` with a single batched lookup.
    ///
    /// Lookup failures degrade to an empty map; the listing is still served.
    async fn registrants(&self, books: &[Book]) -> HashMap<UserId, Registrant> {
        let ids: Vec<UserId> = books
            .iter()
            .filter_map(Book::registrant_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if ids.is_empty() {
            return HashMap::new();
        }

        match self.users.find_by_ids(&ids).await {
            Ok(users) => users
                .iter()
                .map(|user| (user.id, Registrant::from(user)))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Registrant lookup failed, listing books without them");
                HashMap::new()
            }
        }
    }
}

#[async_trait]
impl<BR, UR> BookServicePort for BookService<BR, UR>
where
    BR: BookRepository,
    UR: UserRepository,
{
    async fn list_books(&self) -> Result<Vec<CatalogEntry>, BookError> {
        let books = self.books.list_all().await?;
        let registrants = self.registrants(&books).await;

        Ok(books
            .into_iter()
            .map(|book| {
                let registered_by_user = book
                    .registrant_id()
                    .and_then(|id| registrants.get(&id).cloned());
                CatalogEntry {
                    book,
                    registered_by_user,
                }
            })
            .collect())
    }

    async fn create_book(
        &self,
        command: CreateBookCommand,
        registered_by: UserId,
    ) -> Result<Book, BookError> {
        let book = self
            .books
            .create(NewBook {
                isbn: command.isbn,
                title: command.title,
                author: command.author,
                release_date: command.release_date,
                registered_by: registered_by.to_string(),
            })
            .await?;

        tracing::info!(
            book_id = %book.id,
            isbn = %book.isbn,
            registered_by = %registered_by,
            "Book created"
        );

        Ok(book)
    }

    async fn delete_book(&self, id: &BookId) -> Result<(), BookError> {
        self.books.delete(id).await?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}
