//! Command Handlers module
//!
//! Handlers that orchestrate business operations over the repositories.

mod commands;
mod session_handler;
mod statement_service;
mod user_handler;


pub use commands::*;
pub use session_handler::AuthenticateUserHandler;
pub use statement_service::StatementService;
pub use user_handler::{CreateUserHandler, ShowUserProfileHandler};
