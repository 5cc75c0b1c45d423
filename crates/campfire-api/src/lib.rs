//! Campfire REST API
//!
//! This crate provides the Axum-based HTTP API for Campfire: signup and
//! signin, collaborative stories, relay continuations, and like toggles.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
