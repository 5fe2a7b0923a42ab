//! API module
//!
//! HTTP API endpoints, middleware and shared state.

pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, InMemoryAppState, PgAppState};
