//! Session store and session helpers
//!
//! Sessions live in the `tower_sessions` table next to the application data,
//! so they survive restarts and are shared by every instance using the same
//! database. The cookie only carries a signed session ID.

use argon2::Argon2;
use common::error::DatabaseError;
use sqlx::SqlitePool;
use time::Duration;
use tower_sessions::{
    Expiry, Session, SessionManagerLayer,
    cookie::{Key, SameSite},
    service::SignedCookie,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::SessionContext,
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Session key under which the authenticated user is stored
const USER_KEY: &str = "user";

const KEY_SALT: &[u8] = b"shortener-session-cookie";

/// Open the SQL session store on `pool`, creating its table if needed
pub async fn init_store(pool: SqlitePool) -> AppResult<SqliteStore> {
    let store = SqliteStore::new(pool);
    store
        .migrate()
        .await
        .map_err(|e| DatabaseError::Migration(format!("Session store: {}", e)))?;

    Ok(store)
}

/// Derive the 64-byte cookie signing key from `SECRET_KEY`
pub fn signing_key(secret: &str) -> AppResult<Key> {
    let mut bytes = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), KEY_SALT, &mut bytes)
        .map_err(|e| AppError::Internal(format!("Failed to derive session key: {}", e)))?;

    Ok(Key::from(&bytes))
}

/// Session middleware: signed `session` cookie, expiry after `ttl_seconds` of inactivity
pub fn layer(
    store: SqliteStore,
    key: Key,
    ttl_seconds: u64,
) -> SessionManagerLayer<SqliteStore, SignedCookie> {
    let ttl = Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX));

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(ttl))
        .with_signed(key)
}

/// Bind `user` to the session under a fresh session ID
pub async fn begin(session: &Session, user: &SessionContext) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user).await?;

    info!("Session started for user: {}", user.username);
    Ok(())
}

/// The authenticated user, if the session has one
pub async fn current_user(session: &Session) -> AppResult<Option<SessionContext>> {
    Ok(session.get(USER_KEY).await?)
}

/// Drop all session data and delete the record from the store
pub async fn end(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}
