//! Statement Service
//!
//! Validates and records deposits and withdrawals, and answers statement and
//! balance queries for the authenticated user.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Amount, Balance, DomainError, NewStatement, OperationType, Statement};
use crate::error::AppResult;
use crate::ledger::{ensure_sufficient_funds, BalanceAggregator, StatementRepository};
use crate::users::UserRepository;

use super::CreateStatementCommand;

/// Longest description the ledger stores
const MAX_DESCRIPTION_LEN: usize = 255;

/// Service for the statement ledger
#[derive(Debug, Clone)]
pub struct StatementService<L, U> {
    ledger: L,
    users: U,
    aggregator: BalanceAggregator<L>,
}

impl<L, U> StatementService<L, U>
where
    L: StatementRepository,
    U: UserRepository,
{
    pub fn new(ledger: L, users: U) -> Self {
        Self {
            aggregator: BalanceAggregator::new(ledger.clone()),
            ledger,
            users,
        }
    }

    /// Record a deposit for `user_id`
    pub async fn create_deposit(&self, user_id: Uuid, amount: Decimal, description: &str) -> AppResult<Statement> {
        self.execute(CreateStatementCommand::deposit(user_id, amount, description))
            .await
    }

    /// Record a withdrawal for `user_id`; refused if it exceeds the balance
    pub async fn create_withdraw(&self, user_id: Uuid, amount: Decimal, description: &str) -> AppResult<Statement> {
        self.execute(CreateStatementCommand::withdraw(user_id, amount, description))
            .await
    }

    /// Execute a create-statement command
    pub async fn execute(&self, command: CreateStatementCommand) -> AppResult<Statement> {
        let amount = Amount::new(command.amount).map_err(DomainError::from)?;
        let description = validate_description(&command.description)?;

        self.ensure_user_exists(command.user_id).await?;

        let statement = match command.operation_type {
            OperationType::Deposit => {
                let entry = NewStatement::deposit(command.user_id, amount, description);
                self.ledger.insert(entry).await?
            }
            OperationType::Withdraw => {
                let entry = NewStatement::withdraw(command.user_id, amount, description);
                self.ledger
                    .insert_guarded(entry, move |history| ensure_sufficient_funds(history, &amount))
                    .await
                    .inspect_err(|e| {
                        if e.is_rejection() {
                            tracing::info!(user_id = %command.user_id, amount = %amount, "Withdrawal refused: {}", e);
                        }
                    })?
            }
        };

        tracing::info!(
            statement_id = %statement.id,
            user_id = %statement.user_id,
            operation = %statement.operation_type,
            amount = %statement.amount,
            "Statement recorded"
        );

        Ok(statement)
    }

    /// Fetch one of the caller's statements.
    ///
    /// A statement owned by another user is reported exactly like a missing one.
    pub async fn get_statement(&self, user_id: Uuid, statement_id: Uuid) -> AppResult<Statement> {
        self.ensure_user_exists(user_id).await?;

        let statement = self
            .ledger
            .find_by_id(statement_id)
            .await?
            .filter(|s| s.is_owned_by(user_id))
            .ok_or(DomainError::StatementNotFound)?;

        Ok(statement)
    }

    /// Current balance and statement list of `user_id`
    pub async fn get_balance(&self, user_id: Uuid) -> AppResult<(Balance, Vec<Statement>)> {
        self.ensure_user_exists(user_id).await?;

        Ok(self.aggregator.get_balance(user_id).await?)
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> AppResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::UserNotFound(user_id).into()),
        }
    }
}

fn validate_description(description: &str) -> Result<&str, DomainError> {
    let description = description.trim();

    if description.is_empty() {
        return Err(DomainError::InvalidDescription("description must not be empty".to_string()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::InvalidDescription(format!(
            "description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }

    Ok(description)
}
