//! Link model and related payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Short code to original URL mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub user_id: Option<i64>,
    #[sqlx(rename = "original")]
    pub original_url: String,
    #[sqlx(rename = "short")]
    pub short_code: String,
}

/// A freshly stored link together with its public URL
#[derive(Debug, Clone, Serialize)]
pub struct ShortenedLink {
    pub link: Link,
    pub short_url: String,
}

/// Row shown on the index page
#[derive(Debug, Clone, Serialize)]
pub struct LinkView {
    pub original_url: String,
    pub short_url: String,
}

/// Authenticated shortening form
#[derive(Debug, Clone, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}
