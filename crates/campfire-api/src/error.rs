//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] campfire_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] campfire_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::PreconditionFailed(msg) => (StatusCode::PRECONDITION_FAILED, msg.clone()),
            // Deliberately generic: never reveals which factor failed
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Database(e) => {
                // Persistence failures surface as a generic message; the
                // detail stays in the logs.
                error!("Database error: {}", e);
                match e {
                    campfire_db::DbError::Duplicate(_) => (
                        StatusCode::PRECONDITION_FAILED,
                        "Nickname is already taken".to_string(),
                    ),
                    campfire_db::DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                    _ => (
                        StatusCode::BAD_REQUEST,
                        "The request could not be processed".to_string(),
                    ),
                }
            }
            ApiError::Auth(e) => {
                let status = match e {
                    campfire_auth::AuthError::Jwt(_)
                    | campfire_auth::AuthError::PasswordHash(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNAUTHORIZED,
                };
                (status, e.to_string())
            }
        };

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
