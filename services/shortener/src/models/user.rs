//! User model and related payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// User login credentials, as posted in a JSON body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Login page form
///
/// The page carries two submit buttons: `login` and `shorten`. The anonymous
/// shortening box posts `url_to_shorten` together with the `shorten` button.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub url_to_shorten: Option<String>,
    #[serde(default)]
    pub shorten: Option<String>,
}

impl LoginForm {
    /// Whether the anonymous shortening button was pressed
    pub fn wants_shorten(&self) -> bool {
        self.shorten.is_some()
    }

    /// Credentials carried by the form; missing fields become empty strings
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials {
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        }
    }
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
