//! PostgreSQL statement ledger
//!
//! `statements` table access. Guarded appends serialize on the owner's
//! `users` row (`SELECT ... FOR NO KEY UPDATE`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::domain::{Amount, DomainError, NewStatement, OperationType, Statement};

use super::{LedgerError, StatementRepository};

/// Raw `statements` row
type StatementRecord = (Uuid, Uuid, String, Decimal, String, DateTime<Utc>, DateTime<Utc>);

/// Statement repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStatementRepository {
    pool: PgPool,
}

impl PgStatementRepository {
    /// Create a new PgStatementRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_user_statements<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Statement>, LedgerError>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<StatementRecord> = sqlx::query_as(
            r#"
            SELECT id, user_id, "type", amount, description, created_at, updated_at
            FROM statements
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(into_statement).collect()
    }

    async fn insert_row<'e, E>(executor: E, statement: &NewStatement) -> Result<Statement, LedgerError>
    where
        E: PgExecutor<'e>,
    {
        let row: StatementRecord = sqlx::query_as(
            r#"
            INSERT INTO statements (id, user_id, "type", amount, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, "type", amount, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(statement.user_id)
        .bind(statement.operation_type.as_str())
        .bind(statement.amount.value())
        .bind(&statement.description)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                LedgerError::UserNotFound(statement.user_id)
            }
            other => LedgerError::Database(other),
        })?;

        into_statement(row)
    }
}

fn into_statement(row: StatementRecord) -> Result<Statement, LedgerError> {
    let (id, user_id, operation_type, amount, description, created_at, updated_at) = row;

    let operation_type = operation_type
        .parse::<OperationType>()
        .map_err(|e: String| LedgerError::InvalidRow(format!("statement {}: {}", id, e)))?;
    let amount = Amount::new(amount)
        .map_err(|e| LedgerError::InvalidRow(format!("statement {}: {}", id, e)))?;

    Ok(Statement {
        id,
        user_id,
        operation_type,
        amount,
        description,
        created_at,
        updated_at,
    })
}

impl StatementRepository for PgStatementRepository {
    async fn find_by_id(&self, statement_id: Uuid) -> Result<Option<Statement>, LedgerError> {
        let row: Option<StatementRecord> = sqlx::query_as(
            r#"
            SELECT id, user_id, "type", amount, description, created_at, updated_at
            FROM statements
            WHERE id = $1
            "#,
        )
        .bind(statement_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_statement).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Statement>, LedgerError> {
        Self::fetch_user_statements(&self.pool, user_id).await
    }

    async fn insert(&self, statement: NewStatement) -> Result<Statement, LedgerError> {
        let stored = Self::insert_row(&self.pool, &statement).await?;

        tracing::debug!(
            statement_id = %stored.id,
            user_id = %stored.user_id,
            operation = %stored.operation_type,
            amount = %stored.amount,
            "Statement inserted"
        );

        Ok(stored)
    }

    async fn insert_guarded<F>(&self, statement: NewStatement, admit: F) -> Result<Statement, LedgerError>
    where
        F: FnOnce(&[Statement]) -> Result<(), DomainError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        // Per-user write lock; released on commit or rollback. NO KEY UPDATE
        // does not conflict with the KEY SHARE lock taken by the foreign-key
        // check of a plain insert.
        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR NO KEY UPDATE")
            .bind(statement.user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if locked.is_none() {
            return Err(LedgerError::UserNotFound(statement.user_id));
        }

        let history = Self::fetch_user_statements(&mut *tx, statement.user_id).await?;
        admit(history.as_slice())?;

        let stored = Self::insert_row(&mut *tx, &statement).await?;
        tx.commit().await?;

        tracing::debug!(
            statement_id = %stored.id,
            user_id = %stored.user_id,
            operation = %stored.operation_type,
            amount = %stored.amount,
            prior_statements = history.len(),
            "Guarded statement committed"
        );

        Ok(stored)
    }
}
