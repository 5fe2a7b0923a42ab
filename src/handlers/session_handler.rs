//! Session Handler
//!
//! Exchanges email and password for a bearer token.

use crate::auth::{verify_password, TokenService};
use crate::error::{AppError, AppResult};
use crate::users::UserRepository;

use super::{AuthenticateUserCommand, AuthenticateUserResult};

/// Handler for opening sessions
#[derive(Debug, Clone)]
pub struct AuthenticateUserHandler<U> {
    users: U,
    tokens: TokenService,
}

impl<U: UserRepository> AuthenticateUserHandler<U> {
    pub fn new(users: U, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Execute the authenticate command.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn execute(&self, command: AuthenticateUserCommand) -> AppResult<AuthenticateUserResult> {
        let user = match self.users.find_by_email(command.email.trim()).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Authentication failed: unknown email");
                return Err(AppError::IncorrectCredentials);
            }
        };

        let password = command.password;
        let password_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {}", e)))??;

        if !matches {
            tracing::warn!(user_id = %user.id, "Authentication failed: wrong password");
            return Err(AppError::IncorrectCredentials);
        }

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "Session created");

        Ok(AuthenticateUserResult { user, token })
    }
}
