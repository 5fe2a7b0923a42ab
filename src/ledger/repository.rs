//! Statement Repository
//!
//! Storage seam for the append-only statement log.

use std::future::Future;

use uuid::Uuid;

use crate::domain::{DomainError, NewStatement, Statement};

use super::LedgerError;

/// Append-only statement storage.
///
/// Implementations must make `insert_guarded` atomic per user: the admission
/// check sees every statement committed for that user before it, and no other
/// guarded append for the same user can interleave between check and insert.
pub trait StatementRepository: Clone + Send + Sync + 'static {
    /// Find a statement by id, regardless of owner
    fn find_by_id(
        &self,
        statement_id: Uuid,
    ) -> impl Future<Output = Result<Option<Statement>, LedgerError>> + Send;

    /// All statements of a user in creation order
    fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Statement>, LedgerError>> + Send;

    /// Append a statement unconditionally
    fn insert(
        &self,
        statement: NewStatement,
    ) -> impl Future<Output = Result<Statement, LedgerError>> + Send;

    /// Append a statement if `admit` accepts the owner's current history.
    ///
    /// A rejection from `admit` is returned as `LedgerError::Rejected` and
    /// leaves the ledger untouched.
    fn insert_guarded<F>(
        &self,
        statement: NewStatement,
        admit: F,
    ) -> impl Future<Output = Result<Statement, LedgerError>> + Send
    where
        F: FnOnce(&[Statement]) -> Result<(), DomainError> + Send;
}
