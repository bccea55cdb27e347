use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::Error as SqlxError;

/// Application error type for unified error handling across the app.
///
/// Every failure in the middleware chain is terminal: it renders the JSON
/// envelope `{"error": ...}` and the downstream handler never runs. Storage
/// transport failures map to 500 and are logged; they are never conflated
/// with a legitimate "absent record" outcome.
#[derive(Debug)]
pub enum AppError {
    /// Request carries no usable session or token (401).
    NoAuthToken,

    /// Credential reconstruction failed on every path (401).
    NotAuthorized,

    /// Identity key present but structurally unparseable (401).
    InvalidIdentity,

    /// Resolved email has no backing user record (400).
    UserNotFound,

    /// Authenticated caller lacks sufficient rank (401).
    AccessDenied,

    /// Malformed route or organization identifier (400).
    BadRequest(String),

    /// Resource does not exist (404).
    NotFound(String),

    /// Invalid input data (400).
    Validation(String),

    /// Credential check failures during login/signup (400).
    Auth(String),

    /// Database errors (500).
    Database(SqlxError),

    /// Generic internal errors (500).
    Internal,
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::NoAuthToken => (
                StatusCode::UNAUTHORIZED,
                "no authorization token or session cookie provided".to_string(),
            ),
            AppError::NotAuthorized => (StatusCode::UNAUTHORIZED, "not authorized".to_string()),
            AppError::InvalidIdentity => (
                StatusCode::UNAUTHORIZED,
                "invalid session identity".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::BAD_REQUEST, "user not found".to_string()),
            AppError::AccessDenied => (StatusCode::UNAUTHORIZED, "access denied".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Auth(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(err) => {
                tracing::error!(%err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}
