use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;

pub async fn health() -> Result<ApiSuccess<HealthData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, HealthData { status: "ok" }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: &'static str,
}
