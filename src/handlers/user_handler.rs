//! User Handlers
//!
//! Registration and profile lookup.

use uuid::Uuid;

use crate::auth::hash_password;
use crate::domain::{DomainError, NewUser, User};
use crate::error::{AppError, AppResult};
use crate::users::UserRepository;

use super::CreateUserCommand;

/// Handler for user registration
#[derive(Debug, Clone)]
pub struct CreateUserHandler<U> {
    users: U,
}

impl<U: UserRepository> CreateUserHandler<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Execute the create user command
    pub async fn execute(&self, command: CreateUserCommand) -> AppResult<User> {
        let name = command.name.trim().to_string();
        let email = command.email.trim().to_string();

        if name.is_empty() {
            return Err(AppError::InvalidRequest("name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(AppError::InvalidRequest("email is invalid".to_string()));
        }
        if command.password.is_empty() {
            return Err(AppError::InvalidRequest("password is required".to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::UserAlreadyExists.into());
        }

        // Argon2 is CPU-bound; keep it off the async workers
        let password = command.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))??;

        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }
}

/// Handler for profile lookup
#[derive(Debug, Clone)]
pub struct ShowUserProfileHandler<U> {
    users: U,
}

impl<U: UserRepository> ShowUserProfileHandler<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}
