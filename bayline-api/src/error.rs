use r2e::prelude::{IntoResponse, Json, Response, StatusCode};
use r2e::r2e_data::DataError;
use r2e::r2e_security::SecurityError;

/// Application-level error taxonomy. Services translate storage/security
/// errors into this at the boundary; the HTTP surface maps it to a status
/// code and a `{success: false, error}` envelope.
#[derive(Debug)]
pub enum AppError {
    Invalid(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    AlreadyExists(String),
    Expired(String),
    Revoked(String),
    Timeout(String),
    Internal(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg),
            AppError::Expired(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Revoked(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %message, "internal error");
            "internal error".to_string()
        } else {
            message.to_string()
        };
        let body = serde_json::json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (status, message) = self.status_and_message();
        write!(f, "{status}: {message}")
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("resource not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::AlreadyExists("resource already exists".into())
            }
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => AppError::NotFound(msg),
            DataError::Database(e) => AppError::Internal(e.to_string()),
            DataError::Other(msg) => AppError::Internal(msg),
        }
    }
}

impl From<SecurityError> for AppError {
    fn from(err: SecurityError) -> Self {
        AppError::Unauthenticated(err.public_message().to_string())
    }
}
