//! Custom error types for the common library
//!
//! This module defines the storage error type shared by every service that
//! talks to the link and credential tables.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating the schema
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Whether the failure is a UNIQUE (or primary key) constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Connection(SqlxError::Database(e))
            | DatabaseError::Query(SqlxError::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
