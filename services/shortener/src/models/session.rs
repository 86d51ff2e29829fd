//! Session model and related functionality

use serde::{Deserialize, Serialize};

/// Authenticated user held in the session
///
/// Inserted into request extensions by the auth middleware and handed to
/// handlers explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: i64,
    pub username: String,
}
