//! Common library for the link shortener
//!
//! This crate provides the storage pieces shared by the services: SQLite
//! connection pooling, idempotent schema creation, health checks and the
//! storage error type.

pub mod database;
pub mod error;
