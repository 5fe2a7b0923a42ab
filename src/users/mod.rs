//! User Directory module
//!
//! Stores user identity and credentials.

mod error;
pub mod memory;
pub mod postgres;
mod repository;

pub use error::UserStoreError;
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
