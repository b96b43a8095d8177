//! Process-local record stores.
//!
//! Each store keeps its rows and uniqueness index behind a single
//! `RwLock`, so the duplicate check and the insert happen under one write
//! guard and cannot interleave with another insert.

use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::book::errors::BookError;
use crate::domain::book::models::Book;
use crate::domain::book::models::BookId;
use crate::domain::book::models::NewBook;
use crate::domain::book::ports::BookRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct UserTable {
    last_id: i64,
    rows: BTreeMap<UserId, User>,
    by_email: HashMap<EmailAddress, UserId>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag of a stored user.
    ///
    /// Stands in for the admin tooling that owns deactivation.
    pub async fn set_active(&self, id: &UserId, is_active: bool) -> Result<(), UserError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(id) {
            Some(user) => {
                user.is_active = is_active;
                Ok(())
            }
            None => Err(UserError::Unknown(format!("no user with id {}", id))),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut table = self.table.write().await;

        if table.by_email.contains_key(&user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        table.last_id += 1;
        let user = user.into_user(UserId(table.last_id));
        table.by_email.insert(user.email.clone(), user.id);
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.read().await.rows.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserError> {
        let table = self.table.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| table.rows.get(id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct BookTable {
    last_id: i64,
    rows: BTreeMap<BookId, Book>,
    by_isbn: HashMap<String, BookId>,
}

#[derive(Default)]
pub struct InMemoryBookRepository {
    table: RwLock<BookTable>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: NewBook) -> Result<Book, BookError> {
        let mut table = self.table.write().await;

        if table.by_isbn.contains_key(book.isbn.as_str()) {
            return Err(BookError::IsbnAlreadyExists(book.isbn.as_str().to_string()));
        }

        table.last_id += 1;
        let book = book.into_book(BookId(table.last_id));
        table
            .by_isbn
            .insert(book.isbn.as_str().to_string(), book.id);
        table.rows.insert(book.id, book.clone());

        Ok(book)
    }

    async fn list_all(&self) -> Result<Vec<Book>, BookError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn delete(&self, id: &BookId) -> Result<(), BookError> {
        let mut table = self.table.write().await;

        let book = table
            .rows
            .remove(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;
        table.by_isbn.remove(book.isbn.as_str());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use tokio::task::JoinSet;

    use super::*;
    use crate::domain::book::models::Author;
    use crate::domain::book::models::Isbn;
    use crate::domain::book::models::Title;
    use crate::domain::user::models::UserName;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: EmailAddress::new(email.to_string()).unwrap(),
            name: UserName::new("A".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            is_active: true,
            is_staff: false,
        }
    }

    fn new_book(isbn: &str) -> NewBook {
        NewBook {
            isbn: Isbn::new(isbn.to_string(), 13).unwrap(),
            title: Title::new("T".to_string()).unwrap(),
            author: Author::new("A".to_string()).unwrap(),
            release_date: NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            registered_by: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_ids_are_sequential() {
        let repository = InMemoryUserRepository::new();

        let first = repository.create(new_user("a@x.com")).await.unwrap();
        let second = repository.create(new_user("b@x.com")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryUserRepository::new();

        repository.create(new_user("a@x.com")).await.unwrap();
        let result = repository.create(new_user("A@X.COM")).await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(email)) if email == "a@x.com"));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(new_user("a@x.com")).await.unwrap();

        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        assert_eq!(repository.find_by_email(&email).await.unwrap(), Some(created.clone()));
        assert_eq!(repository.find_by_id(&created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(
            repository
                .find_by_ids(&[created.id, UserId(99)])
                .await
                .unwrap(),
            vec![created]
        );
    }

    #[tokio::test]
    async fn test_set_active() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(new_user("a@x.com")).await.unwrap();

        repository.set_active(&created.id, false).await.unwrap();

        let stored = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert!(repository.set_active(&UserId(99), false).await.is_err());
    }

    #[tokio::test]
    async fn test_books_listed_in_insertion_order() {
        let repository = InMemoryBookRepository::new();

        repository.create(new_book("2222222222222")).await.unwrap();
        repository.create(new_book("1111111111111")).await.unwrap();

        let isbns: Vec<String> = repository
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.isbn.as_str().to_string())
            .collect();
        assert_eq!(isbns, vec!["2222222222222", "1111111111111"]);
    }

    #[tokio::test]
    async fn test_delete_frees_isbn() {
        let repository = InMemoryBookRepository::new();

        let book = repository.create(new_book("1111111111111")).await.unwrap();
        repository.delete(&book.id).await.unwrap();

        assert!(matches!(
            repository.delete(&book.id).await,
            Err(BookError::NotFound(_))
        ));

        let again = repository.create(new_book("1111111111111")).await.unwrap();
        assert_eq!(again.id, BookId(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_same_isbn_one_wins() {
        let repository = Arc::new(InMemoryBookRepository::new());

        let mut tasks = JoinSet::new();
        for _ in 0..32 {
            let repository = Arc::clone(&repository);
            tasks.spawn(async move { repository.create(new_book("1111111111111")).await });
        }

        let mut created = 0;
        let mut duplicates = 0;
        while let Some(result) = tasks.join_next().await {
            match result.expect("task panicked") {
                Ok(_) => created += 1,
                Err(BookError::IsbnAlreadyExists(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 31);
        assert_eq!(repository.list_all().await.unwrap().len(), 1);
    }
}
