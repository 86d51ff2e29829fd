//! Application state shared across handlers

use sqlx::SqlitePool;
use tower_sessions::cookie::Key;
use tower_sessions_sqlx_store::SqliteStore;

use crate::{
    config::AppConfig,
    error::AppResult,
    repositories::{LinkRepository, UserRepository},
    session,
    ui::Renderer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub user_repository: UserRepository,
    pub link_repository: LinkRepository,
    pub session_store: SqliteStore,
    pub session_key: Key,
    pub renderer: Renderer,
}

impl AppState {
    /// Wire repositories, the session store and templates around a pool
    pub async fn new(config: AppConfig, pool: SqlitePool) -> AppResult<Self> {
        Ok(Self {
            user_repository: UserRepository::new(pool.clone()),
            link_repository: LinkRepository::new(pool.clone()),
            session_store: session::init_store(pool).await?,
            session_key: session::signing_key(&config.secret_key)?,
            renderer: Renderer::new()?,
            config,
        })
    }
}
