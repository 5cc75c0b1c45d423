//! Application state

use campfire_auth::TokenService;
use campfire_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }
}
