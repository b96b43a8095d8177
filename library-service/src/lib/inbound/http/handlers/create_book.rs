use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::book::errors::BookError;
use crate::domain::book::models::parse_release_date;
use crate::domain::book::models::Author;
use crate::domain::book::models::CreateBookCommand;
use crate::domain::book::models::Isbn;
use crate::domain::book::models::Title;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_book(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<ApiSuccess<CreateBookResponseData>, ApiError> {
    let Json(body) = payload?;
    let command = body.try_into_command(state.isbn_length)?;

    tracing::debug!(
        user_id = %auth_user.user_id,
        email = %auth_user.email,
        isbn = %command.isbn,
        "Create requested"
    );

    state
        .book_service
        .create_book(command, auth_user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|book| {
            ApiSuccess::new(
                StatusCode::CREATED,
                CreateBookResponseData { id: book.id.0 },
            )
        })
}

/// HTTP request body for adding a book (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBookRequest {
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
    release_date: Option<String>,
}

impl CreateBookRequest {
    fn try_into_command(self, isbn_length: usize) -> Result<CreateBookCommand, BookError> {
        Ok(CreateBookCommand {
            isbn: Isbn::new(self.isbn.unwrap_or_default(), isbn_length)?,
            title: Title::new(self.title.unwrap_or_default())?,
            author: Author::new(self.author.unwrap_or_default())?,
            release_date: parse_release_date(self.release_date.as_deref().unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBookResponseData {
    pub id: i64,
}
