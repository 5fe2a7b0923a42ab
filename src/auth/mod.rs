//! Auth Gateway module
//!
//! Bearer token issuance/validation and password hashing primitives.

mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
