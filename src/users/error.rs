//! User store errors

/// Errors that can occur in the user directory
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    /// Email is already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
