//! In-memory statement ledger
//!
//! Process-local store used by tests and the in-memory app state. A single
//! `tokio::sync::Mutex` guards the log, so guarded appends are serialized
//! for every user.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{DomainError, NewStatement, Statement};

use super::{LedgerError, StatementRepository};

/// Statement repository held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatementRepository {
    statements: Arc<Mutex<Vec<Statement>>>,
}

impl InMemoryStatementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored statements, all users
    pub async fn len(&self) -> usize {
        self.statements.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn append(log: &mut Vec<Statement>, statement: NewStatement) -> Statement {
        let stored = statement.into_statement(Uuid::new_v4(), Utc::now());
        log.push(stored.clone());
        stored
    }
}

impl StatementRepository for InMemoryStatementRepository {
    async fn find_by_id(&self, statement_id: Uuid) -> Result<Option<Statement>, LedgerError> {
        let log = self.statements.lock().await;
        Ok(log.iter().find(|s| s.id == statement_id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Statement>, LedgerError> {
        let log = self.statements.lock().await;
        Ok(log.iter().filter(|s| s.is_owned_by(user_id)).cloned().collect())
    }

    async fn insert(&self, statement: NewStatement) -> Result<Statement, LedgerError> {
        let mut log = self.statements.lock().await;
        Ok(Self::append(&mut log, statement))
    }

    async fn insert_guarded<F>(&self, statement: NewStatement, admit: F) -> Result<Statement, LedgerError>
    where
        F: FnOnce(&[Statement]) -> Result<(), DomainError> + Send,
    {
        let mut log = self.statements.lock().await;

        let history: Vec<Statement> = log
            .iter()
            .filter(|s| s.is_owned_by(statement.user_id))
            .cloned()
            .collect();
        admit(history.as_slice())?;

        Ok(Self::append(&mut log, statement))
    }
}
