//! User repository for database operations

use common::error::DatabaseError;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user; fails with `DuplicateUsername` when the name is taken
    pub async fn create(&self, username: &str, password_hash: &str) -> AppResult<User> {
        info!("Creating new user: {}", username);

        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::DuplicateUsername(username.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(user)
    }
}
