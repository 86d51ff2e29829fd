use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod auth;
mod codegen;
mod config;
mod error;
mod flash;
mod links;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod session;
mod state;
mod test_utils;
mod ui;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool, init_schema};
use tokio::net::TcpListener;
use tower_sessions::session_store::ExpiredDeletion;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting link shortener");

    let config = AppConfig::from_env()?;
    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set; sessions are signed with an insecure default");
    }

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    init_schema(&pool).await?;

    let port = config.port;
    let app_state = AppState::new(config, pool).await?;

    // Sweep expired sessions in the background
    let session_store = app_state.session_store.clone();
    tokio::task::spawn(
        session_store.continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Link shortener listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
