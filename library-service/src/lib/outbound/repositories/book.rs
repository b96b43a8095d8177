use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::book::errors::BookError;
use crate::domain::book::models::Author;
use crate::domain::book::models::Book;
use crate::domain::book::models::BookId;
use crate::domain::book::models::Isbn;
use crate::domain::book::models::NewBook;
use crate::domain::book::models::Title;
use crate::domain::book::ports::BookRepository;

pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_book(r: PgRow) -> Result<Book, BookError> {
        Ok(Book {
            id: BookId(r.get("id")),
            isbn: Isbn::from_trusted(r.get("isbn")),
            title: Title::new(r.get("title"))?,
            author: Author::new(r.get("author"))?,
            release_date: r.get("release_date"),
            registered_by: r.get("registered_by"),
        })
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create(&self, book: NewBook) -> Result<Book, BookError> {
        // The books_isbn_key constraint is the only uniqueness check: a
        // concurrent insert of the same ISBN fails here, never earlier.
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (isbn, title, author, release_date, registered_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(book.isbn.as_str())
        .bind(book.title.as_str())
        .bind(book.author.as_str())
        .bind(book.release_date)
        .bind(&book.registered_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("books_isbn_key") {
                    return BookError::IsbnAlreadyExists(book.isbn.as_str().to_string());
                }
            }
            BookError::DatabaseError(e.to_string())
        })?;

        Ok(book.into_book(BookId(id)))
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookError> {
        let rows = sqlx::query(
            r#"
            SELECT id, isbn, title, author, release_date, registered_by
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Self::row_to_book).collect()
    }

    async fn delete(&self, id: &BookId) -> Result<(), BookError> {
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(BookError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
