//! Balance Aggregator
//!
//! Derives a user's balance from their statements. Balances are never
//! stored; they are re-computed from the ledger on every read.

use uuid::Uuid;

use crate::domain::{Amount, Balance, DomainError, OperationType, Statement};

use super::{LedgerError, StatementRepository};

/// Compute the balance for a list of statements.
/// Balance = sum of deposits - sum of withdrawals
pub fn compute_balance(statements: &[Statement]) -> Balance {
    statements
        .iter()
        .fold(Balance::zero(), |balance, statement| match statement.operation_type {
            OperationType::Deposit => balance.credit(&statement.amount),
            OperationType::Withdraw => balance.debit(&statement.amount),
        })
}

/// Admission rule for a withdrawal of `amount` against `statements`.
pub fn ensure_sufficient_funds(statements: &[Statement], amount: &Amount) -> Result<(), DomainError> {
    let available = compute_balance(statements);

    if available.is_sufficient_for(amount) {
        Ok(())
    } else {
        Err(DomainError::insufficient_funds(amount.value(), available.value()))
    }
}

/// Read-only balance queries over a statement repository
#[derive(Debug, Clone)]
pub struct BalanceAggregator<L> {
    ledger: L,
}

impl<L: StatementRepository> BalanceAggregator<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Current balance and the ordered statement list of `user_id`
    pub async fn get_balance(&self, user_id: Uuid) -> Result<(Balance, Vec<Statement>), LedgerError> {
        let statements = self.ledger.find_by_user(user_id).await?;
        let balance = compute_balance(&statements);

        Ok((balance, statements))
    }
}
