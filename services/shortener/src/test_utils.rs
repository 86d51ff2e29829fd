//! Test helpers shared by the unit tests

#![cfg(test)]

use common::database::{DatabaseConfig, init_pool, init_schema};
use sqlx::SqlitePool;

use crate::{config::AppConfig, state::AppState};

/// Fresh in-memory database with the schema applied
pub async fn test_pool() -> SqlitePool {
    let pool = init_pool(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to create test pool");
    init_schema(&pool).await.expect("Failed to create schema");
    pool
}

/// Default configuration with a fixed signing secret
pub fn test_config() -> AppConfig {
    AppConfig {
        secret_key: "test-secret".to_string(),
        ..AppConfig::default()
    }
}

/// Application state over a fresh in-memory database
pub async fn test_state() -> AppState {
    AppState::new(test_config(), test_pool().await)
        .await
        .expect("Failed to build test state")
}
