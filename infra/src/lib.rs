//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Gurmania backend,
//! following Clean Architecture principles. It provides concrete implementations
//! of the core repository and service traits.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL repositories using SQLx, plus embedded migrations
//! - **Cache**: Redis client with retry logic
//! - **Services**: Redis and in-memory rate limiters
//! - **Mail**: Resend HTTP API client and a recording mock
//! - **Backend**: wiring of the above for the configured storage backend

pub mod backend;
pub mod cache;
pub mod database;
pub mod mail;
pub mod services;

pub use backend::{Backend, Repositories};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail provider error
    #[error("Mail service error: {0}")]
    Mail(String),
}
