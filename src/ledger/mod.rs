//! Statement Ledger module
//!
//! Append-only log of deposits and withdrawals, its storage backends, and
//! the balance aggregator that reads it.

pub mod aggregate;
mod error;
pub mod memory;
pub mod postgres;
mod repository;

pub use aggregate::{compute_balance, ensure_sufficient_funds, BalanceAggregator};
pub use error::LedgerError;
pub use memory::InMemoryStatementRepository;
pub use postgres::PgStatementRepository;
pub use repository::StatementRepository;
