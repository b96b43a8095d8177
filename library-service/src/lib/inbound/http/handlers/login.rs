use auth::TokenSubject;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RawPassword;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Every client-side login failure is a 401; only internal faults are not.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::Unauthorized(e.body_text()))?;
    let command = body
        .try_into_command()
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = state
        .user_service
        .authenticate(command)
        .await
        .map_err(|e| match e {
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            _ => ApiError::from(e),
        })?;

    let tokens = state
        .token_issuer
        .issue(&TokenSubject::new(user.id, &user.email))
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access: tokens.access_token,
            refresh: tokens.refresh_token,
            user_id: user.id.0,
            user_email: user.email.as_str().to_string(),
            expires_at: tokens.expires_at.timestamp(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, UserError> {
        Ok(LoginCommand {
            email: EmailAddress::new(self.email.unwrap_or_default())?,
            password: RawPassword::new(self.password.unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access: String,
    pub refresh: String,
    pub user_id: i64,
    pub user_email: String,
    /// Access token expiry, unix seconds
    pub expires_at: i64,
}
