//! Application state
//!
//! Explicit wiring of the repositories and token service shared by handlers.

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::ledger::{InMemoryStatementRepository, PgStatementRepository, StatementRepository};
use crate::users::{InMemoryUserRepository, PgUserRepository, UserRepository};

/// State shared by every route
#[derive(Debug, Clone)]
pub struct AppState<L, U> {
    pub ledger: L,
    pub users: U,
    pub tokens: TokenService,
}

/// Production state backed by PostgreSQL
pub type PgAppState = AppState<PgStatementRepository, PgUserRepository>;

/// Process-local state for tests and demos
pub type InMemoryAppState = AppState<InMemoryStatementRepository, InMemoryUserRepository>;

impl<L, U> AppState<L, U>
where
    L: StatementRepository,
    U: UserRepository,
{
    pub fn new(ledger: L, users: U, tokens: TokenService) -> Self {
        Self { ledger, users, tokens }
    }
}

impl PgAppState {
    pub fn from_pool(pool: PgPool, tokens: TokenService) -> Self {
        Self::new(
            PgStatementRepository::new(pool.clone()),
            PgUserRepository::new(pool),
            tokens,
        )
    }
}

impl InMemoryAppState {
    pub fn in_memory(tokens: TokenService) -> Self {
        Self::new(
            InMemoryStatementRepository::new(),
            InMemoryUserRepository::new(),
            tokens,
        )
    }
}
