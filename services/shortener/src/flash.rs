//! One-shot flash messages kept in the session across a redirect

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;

/// Session key holding the pending flash
const FLASH_KEY: &str = "flash";

/// Messages that survive exactly one redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flash {
    LoginSucceeded,
    Registered,
    LoggedOut,
}

impl Flash {
    /// The message shown to the user
    pub fn message(self) -> FlashMessage {
        match self {
            Flash::LoginSucceeded => FlashMessage::success("Login successful"),
            Flash::Registered => FlashMessage::success("Registration successful! Please log in."),
            Flash::LoggedOut => FlashMessage::info("Logged out."),
        }
    }
}

/// A rendered message with its category (`success`, `error`, `info`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashMessage {
    pub category: &'static str,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: "error",
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            category: "info",
            message: message.into(),
        }
    }
}

/// Queue a flash for the next page render
pub async fn set(session: &Session, flash: Flash) -> AppResult<()> {
    session.insert(FLASH_KEY, flash).await?;
    Ok(())
}

/// Consume the pending flash, if any
pub async fn take(session: &Session) -> AppResult<Vec<FlashMessage>> {
    Ok(session
        .remove::<Flash>(FLASH_KEY)
        .await?
        .map(|flash| vec![flash.message()])
        .unwrap_or_default())
}
