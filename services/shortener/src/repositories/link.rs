//! Link repository for database operations

use common::error::DatabaseError;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::Link,
};

/// Link repository
#[derive(Clone)]
pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    /// Create a new link repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether a row with this short code exists
    pub async fn code_exists(&self, code: &str) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM urls WHERE short = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(found.is_some())
    }

    /// Store a new link
    ///
    /// The UNIQUE constraint on `short` is the final arbiter: a taken code
    /// fails with `DuplicateShortCode` and the existing row is never replaced.
    pub async fn insert(
        &self,
        owner: Option<i64>,
        original_url: &str,
        code: &str,
    ) -> AppResult<Link> {
        let result = sqlx::query("INSERT INTO urls (user_id, original, short) VALUES (?, ?, ?)")
            .bind(owner)
            .bind(original_url)
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::DuplicateShortCode(code.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(Link {
            id: result.last_insert_rowid(),
            user_id: owner,
            original_url: original_url.to_string(),
            short_code: code.to_string(),
        })
    }

    /// Exact-match lookup by short code
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            "SELECT id, user_id, original, short FROM urls WHERE short = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(link)
    }

    /// All links owned by a user, oldest first
    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Link>> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT id, user_id, original, short FROM urls WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(links)
    }
}
