//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors
///
/// These errors represent business rule violations. They are independent of
/// the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Withdrawal exceeds the current balance
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    /// Invalid amount (zero, negative, sub-cent or exceeds limit)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid statement description
    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    /// Statement does not exist or belongs to someone else
    #[error("Statement not found")]
    StatementNotFound,

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Email already registered
    #[error("User already exists")]
    UserAlreadyExists,
}

impl DomainError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds { required, available }
    }
}

impl From<super::AmountError> for DomainError {
    fn from(err: super::AmountError) -> Self {
        DomainError::InvalidAmount(err.to_string())
    }
}
