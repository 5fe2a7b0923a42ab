//! Ledger Errors
//!
//! Error types for statement repository operations.

use uuid::Uuid;

use crate::domain::DomainError;

/// Errors that can occur in the statement ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Owner row missing when taking the per-user write lock
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Admission check refused the append; nothing was written
    #[error(transparent)]
    Rejected(#[from] DomainError),

    /// Stored row violates a domain invariant
    #[error("Invalid statement row: {0}")]
    InvalidRow(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    /// Check if this error is a business rejection rather than an infra failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, LedgerError::Rejected(_) | LedgerError::UserNotFound(_))
    }
}
