//! Campfire Authentication and Authorization
//!
//! This crate provides JWT-based authentication and the password and
//! cookie-transport primitives behind it.

pub mod cookie;
pub mod error;
pub mod identity;
pub mod password;
pub mod token;

pub use cookie::{bearer_token_from_cookies, AUTH_COOKIE};
pub use error::AuthError;
pub use identity::AuthUser;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
