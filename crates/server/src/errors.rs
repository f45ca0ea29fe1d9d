use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::{FieldErrors, ServiceError};

/// Boundary error: every service failure is converted here and rendered as a
/// status plus JSON body. No partial record state ever reaches the client.
#[derive(Debug)]
pub enum ApiError {
    /// 422 with the per-field message map, `{"errors": {field: [msg, ...]}}`
    Validation(FieldErrors),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errs) => ApiError::Validation(errs),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Referential(msg) => ApiError::Conflict(msg),
            ServiceError::InvalidAsset(msg) => {
                // Store-level rejection after field validation passed; still a
                // client problem with the uploaded file.
                let mut errs = FieldErrors::new();
                errs.push("file", msg);
                ApiError::Validation(errs)
            }
            ServiceError::Storage(msg) => ApiError::Internal(format!("storage failure: {msg}")),
            ServiceError::Db(msg) => ApiError::Internal(format!("database failure: {msg}")),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(errs) => ApiError::Validation(errs),
            AuthError::Unauthorized => ApiError::Unauthorized("Invalid credentials".into()),
            other => ApiError::Internal(format!("auth failure (code {}): {}", other.code(), other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errs) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errs })),
            )
                .into_response(),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(msg) => {
                // Detail stays in the logs, the client gets a generic body
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
