use axum::extract::State;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::book::models::CatalogEntry;
use crate::domain::book::models::Registrant;
use crate::inbound::http::router::AppState;

pub async fn list_books(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<BookData>>, ApiError> {
    state
        .book_service
        .list_books()
        .await
        .map_err(ApiError::from)
        .map(|entries| {
            let books: Vec<BookData> = entries.iter().map(|e| e.into()).collect();
            ApiSuccess::new(StatusCode::OK, books)
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookData {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_by_user: Option<RegistrantData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrantData {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&Registrant> for RegistrantData {
    fn from(registrant: &Registrant) -> Self {
        Self {
            id: registrant.id.0,
            name: registrant.name.clone(),
            email: registrant.email.clone(),
        }
    }
}

impl From<&CatalogEntry> for BookData {
    fn from(entry: &CatalogEntry) -> Self {
        let book = &entry.book;
        Self {
            id: book.id.0,
            isbn: book.isbn.as_str().to_string(),
            title: book.title.as_str().to_string(),
            author: book.author.as_str().to_string(),
            release_date: book.release_date,
            registered_by_user: entry.registered_by_user.as_ref().map(|r| r.into()),
        }
    }
}
