//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error code.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Invalid or missing admin keys
/// - **Resource Errors**: Requested users, transactions or approval tokens not found
/// - **Conflict Errors**: Duplicate registrations and reviews of settled transactions
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Admin key is missing, invalid, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid admin key")]
    InvalidAdminKey,

    /// No registered user with the requested user id.
    #[error("User not found")]
    UserNotFound,

    /// No transaction with the requested id.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Approval token is malformed, unknown, or already used.
    ///
    /// Returns HTTP 404 so that token guessing learns nothing.
    #[error("Invalid or expired approval token")]
    InvalidApprovalToken,

    /// Username, user id, email, or phone is already registered.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("User already exists")]
    UserAlreadyExists,

    /// Only pending transactions can be approved or declined.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Transaction is not pending review")]
    TransactionNotPending,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidAdminKey => (StatusCode::UNAUTHORIZED, "invalid_admin_key"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::TransactionNotFound => (StatusCode::NOT_FOUND, "transaction_not_found"),
            AppError::InvalidApprovalToken => (StatusCode::NOT_FOUND, "invalid_approval_token"),
            AppError::UserAlreadyExists => (StatusCode::CONFLICT, "user_already_exists"),
            AppError::TransactionNotPending => (StatusCode::CONFLICT, "transaction_not_pending"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Database errors are logged and replaced by a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::InvalidRequest(msg) => msg,
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error while handling request");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_category() {
        assert_eq!(
            AppError::InvalidAdminKey.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::TransactionNotPending.status_and_code(),
            (StatusCode::CONFLICT, "transaction_not_pending")
        );
        assert_eq!(
            AppError::InvalidApprovalToken.status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        );
    }

    #[test]
    fn invalid_request_keeps_its_message() {
        let response = AppError::InvalidRequest("amount_cents must be positive".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
