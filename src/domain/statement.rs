//! Statement entity
//!
//! One recorded monetary operation in a user's ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::Amount;

/// Kind of monetary operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "deposit",
            OperationType::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(OperationType::Deposit),
            "withdraw" => Ok(OperationType::Withdraw),
            other => Err(format!("unknown operation type '{}'", other)),
        }
    }
}

/// A recorded statement. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub operation_type: OperationType,
    pub amount: Amount,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Statement {
    /// Whether this statement belongs to `user_id`
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// A statement that has been validated but not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatement {
    pub user_id: Uuid,
    pub operation_type: OperationType,
    pub amount: Amount,
    pub description: String,
}

impl NewStatement {
    pub fn deposit(user_id: Uuid, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            user_id,
            operation_type: OperationType::Deposit,
            amount,
            description: description.into(),
        }
    }

    pub fn withdraw(user_id: Uuid, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            user_id,
            operation_type: OperationType::Withdraw,
            amount,
            description: description.into(),
        }
    }

    /// Assign identity and timestamps
    pub fn into_statement(self, id: Uuid, created_at: DateTime<Utc>) -> Statement {
        Statement {
            id,
            user_id: self.user_id,
            operation_type: self.operation_type,
            amount: self.amount,
            description: self.description,
            created_at,
            updated_at: created_at,
        }
    }
}
