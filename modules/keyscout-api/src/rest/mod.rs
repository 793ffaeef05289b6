pub mod keywords;
pub mod strategy;
pub mod translate;

use axum::response::{IntoResponse, Json};

use crate::error::ApiError;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// A body field that is present and not blank.
pub(crate) fn required(field: &Option<String>) -> Result<&str, ApiError> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingFields)
}
