//! Command definitions
//!
//! Commands represent intentions to change the system state.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::OperationType;

/// Command to record a deposit or withdrawal
#[derive(Debug, Clone)]
pub struct CreateStatementCommand {
    pub user_id: Uuid,
    pub operation_type: OperationType,
    /// Raw amount; validated into an `Amount` by the handler
    pub amount: Decimal,
    pub description: String,
}

impl CreateStatementCommand {
    pub fn deposit(user_id: Uuid, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            user_id,
            operation_type: OperationType::Deposit,
            amount,
            description: description.into(),
        }
    }

    pub fn withdraw(user_id: Uuid, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            user_id,
            operation_type: OperationType::Withdraw,
            amount,
            description: description.into(),
        }
    }
}

/// Command to register a new user
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserCommand {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self { name, email, password }
    }
}

/// Command to open a session with email and password
#[derive(Debug, Clone)]
pub struct AuthenticateUserCommand {
    pub email: String,
    pub password: String,
}

impl AuthenticateUserCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Result of a successful authentication
#[derive(Debug, Clone)]
pub struct AuthenticateUserResult {
    pub user: crate::domain::User,
    pub token: String,
}
