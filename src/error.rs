//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthError;
use crate::domain::DomainError;
use crate::ledger::LedgerError;
use crate::users::UserStoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Incorrect email or password")]
    IncorrectCredentials,

    #[error("JWT token is missing!")]
    MissingToken,

    #[error("JWT invalid token!")]
    InvalidToken,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(domain) => AppError::Domain(domain),
            LedgerError::UserNotFound(user_id) => AppError::Domain(DomainError::UserNotFound(user_id)),
            LedgerError::Database(e) => AppError::Database(e),
            LedgerError::InvalidRow(msg) => AppError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<UserStoreError> for AppError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::DuplicateEmail(_) => AppError::Domain(DomainError::UserAlreadyExists),
            UserStoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) => AppError::InvalidToken,
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid request",
                "invalid_request",
                Some(msg.clone()),
            ),

            // 401 Unauthorized
            AppError::IncorrectCredentials => (
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password",
                "incorrect_credentials",
                None,
            ),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "JWT token is missing!",
                "missing_token",
                None,
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "JWT invalid token!",
                "invalid_token",
                None,
            ),

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InsufficientFunds { .. } => (
                    StatusCode::BAD_REQUEST,
                    "Insufficient funds",
                    "insufficient_funds",
                    Some(domain_err.to_string()),
                ),
                DomainError::InvalidAmount(msg) => (
                    StatusCode::BAD_REQUEST,
                    "Invalid amount",
                    "invalid_amount",
                    Some(msg.clone()),
                ),
                DomainError::InvalidDescription(msg) => (
                    StatusCode::BAD_REQUEST,
                    "Invalid request",
                    "invalid_request",
                    Some(msg.clone()),
                ),
                DomainError::UserAlreadyExists => (
                    StatusCode::BAD_REQUEST,
                    "User already exists",
                    "user_already_exists",
                    None,
                ),
                DomainError::StatementNotFound => (
                    StatusCode::NOT_FOUND,
                    "Statement not found",
                    "statement_not_found",
                    None,
                ),
                DomainError::UserNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "User not found",
                    "user_not_found",
                    None,
                ),
            },

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "config_error", None)
            }
        };

        let body = ErrorResponse {
            message: message.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_insufficient_funds_is_bad_request() {
        let response = AppError::Domain(DomainError::insufficient_funds(dec!(300), dec!(100))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_mapping() {
        let response = AppError::Domain(DomainError::StatementNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(LedgerError::UserNotFound(Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(AppError::MissingToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_ledger_rejection_unwraps_domain_error() {
        let err = AppError::from(LedgerError::Rejected(DomainError::InvalidAmount("zero".into())));
        assert!(matches!(err, AppError::Domain(DomainError::InvalidAmount(_))));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = AppError::Internal("connection reset".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
