use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("operation not allowed: {0}")]
    NotAllowed(String),

    #[error("account is not active")]
    UserNotActive,

    #[error("access denied")]
    AccessDenied,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotAllowed(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::UserNotActive => {
                (StatusCode::FORBIDDEN, "account is not active".to_string())
            }
            AppError::AccessDenied => (StatusCode::UNAUTHORIZED, "access denied".to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
