//! Custom error types for the shortener service

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Static page served for unknown codes and unmatched routes
pub const NOT_FOUND_PAGE: &str = include_str!("../templates/404.html");

/// Custom error type for the shortener service
#[derive(Error, Debug)]
pub enum AppError {
    /// Registration with a username that is already taken
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Unknown username or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No link for the requested code, or no route for the request
    #[error("Not found")]
    NotFound,

    /// The store already holds a row with this short code
    #[error("Short code already in use: {0}")]
    DuplicateShortCode(String),

    /// Rejected form input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password hashing or hash parsing failure
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Anything else that should never reach the client verbatim
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            AppError::DuplicateUsername(_) => {
                (StatusCode::CONFLICT, "Username already exists.").into_response()
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Type alias for service results
pub type AppResult<T> = Result<T, AppError>;
