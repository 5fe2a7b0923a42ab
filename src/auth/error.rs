//! Auth errors

/// Errors raised by the token and password primitives
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token failed signature, format or expiry checks
    #[error("Invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Token could not be signed
    #[error("Token encoding failed: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),

    /// Password hashing failed or stored hash is malformed
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}
