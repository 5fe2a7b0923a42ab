//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod context;
pub mod error;
pub mod statement;
pub mod user;

pub use amount::{Amount, AmountError, Balance};
pub use context::OperationContext;
pub use error::DomainError;
pub use statement::{NewStatement, OperationType, Statement};
pub use user::{NewUser, User};
