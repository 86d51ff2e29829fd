//! Input validation for registration

use regex::Regex;
use std::sync::OnceLock;

const MAX_USERNAME_CHARS: usize = 64;
const MAX_PASSWORD_BYTES: usize = 1024;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(format!(
            "Username must be at most {} characters long",
            MAX_USERNAME_CHARS
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[^\s\p{Cc}]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username cannot contain whitespace or control characters".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password must be at most {} bytes long",
            MAX_PASSWORD_BYTES
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a").is_ok());
        assert!(validate_username("bob.smith@example.com").is_ok());
        assert!(validate_username("名前").is_ok());
        assert!(validate_username(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username("tab\there").is_err());
        assert!(validate_username("bell\u{7}").is_err());
        assert!(validate_username(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_passwords() {
        assert!(validate_password("pw123").is_ok());
        assert!(validate_password("with spaces are fine").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"p".repeat(1025)).is_err());
    }
}
