use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::SuccessData;
use crate::book::errors::BookError;
use crate::domain::book::models::BookId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_book(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<SuccessData>, ApiError> {
    let book_id = BookId::from_string(&id).map_err(BookError::from)?;

    state
        .book_service
        .delete_book(&book_id)
        .await
        .map_err(ApiError::from)?;

    tracing::debug!(book_id = %book_id, user_id = %auth_user.user_id, "Delete requested");

    Ok(ApiSuccess::new(StatusCode::OK, SuccessData::ok()))
}
