//! User Repository
//!
//! Storage seam for the user directory.

use std::future::Future;

use uuid::Uuid;

use crate::domain::{NewUser, User};

use super::UserStoreError;

/// User storage
pub trait UserRepository: Clone + Send + Sync + 'static {
    fn find_by_id(&self, user_id: Uuid) -> impl Future<Output = Result<Option<User>, UserStoreError>> + Send;

    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>, UserStoreError>> + Send;

    /// Store a new user. Fails with `DuplicateEmail` if the email is taken.
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, UserStoreError>> + Send;
}
