//! Campfire - Collaborative story-relay backend

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use campfire_api::{AppState, create_router};
use campfire_auth::TokenService;
use campfire_db::Database;
use config::Config;

/// Campfire - Collaborative story-relay backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "CAMPFIRE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "CAMPFIRE_PORT")]
    port: Option<u16>,

    /// JWT signing secret, overriding the config file
    #[arg(long, env = "CAMPFIRE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Campfire v{}", env!("CARGO_PKG_VERSION"));

    // Create the data directory holding the database file
    if let Some(parent) = std::path::Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Create the default admin account if no users exist
    if !db.has_users().await? {
        info!("Creating default admin user");
        let password_hash = campfire_auth::hash_password(&config.auth.admin_password)?;
        db.insert_user(campfire_db::NewUser {
            nickname: config.auth.admin_nickname.clone(),
            password_hash,
            role: campfire_db::Role::Admin,
        })
        .await?;
        info!(
            "Default admin user created (nickname: {})",
            config.auth.admin_nickname
        );
    }

    // Initialize token service; the secret may come from the environment
    let jwt_secret = args.jwt_secret.unwrap_or(config.auth.jwt_secret);
    let tokens = Arc::new(TokenService::new(
        &jwt_secret,
        config.auth.token_expiry_hours,
    ));

    // Create application state and router
    let state = AppState::new(db, tokens);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
