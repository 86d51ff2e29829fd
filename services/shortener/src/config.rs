//! Service configuration loaded from the environment

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Placeholder signing secret used when `SECRET_KEY` is not set
pub const DEFAULT_SECRET_KEY: &str = "dev-secret";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Default session lifetime in seconds (7 days)
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 604_800;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Secret used to sign session tokens
    pub secret_key: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Session lifetime in seconds
    pub session_ttl_seconds: u64,
    /// Public origin used to build short URLs; derived from `Host` when absent
    #[serde(default)]
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SECRET_KEY`: Session signing secret (default: `dev-secret`)
    /// - `PORT`: Listen port (default: 5000)
    /// - `SESSION_TTL_SECONDS`: Session lifetime (default: 604800)
    /// - `BASE_URL`: Public origin for short URLs (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("secret_key", DEFAULT_SECRET_KEY)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("session_ttl_seconds", DEFAULT_SESSION_TTL_SECONDS as i64)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Whether the signing secret is still the insecure placeholder
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            port: DEFAULT_PORT,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("SECRET_KEY");
            std::env::remove_var("PORT");
            std::env::remove_var("SESSION_TTL_SECONDS");
            std::env::remove_var("BASE_URL");
        }
    }

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.secret_key, DEFAULT_SECRET_KEY);
        assert_eq!(config.port, 5000);
        assert_eq!(config.session_ttl_seconds, DEFAULT_SESSION_TTL_SECONDS);
        assert_eq!(config.base_url, None);
        assert!(config.uses_default_secret());
    }

    #[test]
    #[serial]
    fn test_app_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("SECRET_KEY", "correct-horse-battery-staple");
            std::env::set_var("PORT", "8080");
            std::env::set_var("SESSION_TTL_SECONDS", "60");
            std::env::set_var("BASE_URL", "https://sho.rt");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.secret_key, "correct-horse-battery-staple");
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl_seconds, 60);
        assert_eq!(config.base_url.as_deref(), Some("https://sho.rt"));
        assert!(!config.uses_default_secret());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_app_config_rejects_invalid_port() {
        clear_env();
        unsafe {
            std::env::set_var("PORT", "not-a-port");
        }

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }
}
