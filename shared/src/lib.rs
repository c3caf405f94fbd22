//! Shared utilities and common types for the Gurmania server
//!
//! This crate provides common functionality used across all server modules:
//! - Layered configuration types
//! - Error response structures
//! - Validation utilities (email, password policy)
//! - Pagination types

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LoggingConfig, MailConfig, RateLimitConfig, ServerConfig, SessionConfig, StorageBackend,
    TwoFactorConfig, VerificationTokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{PaginatedResponse, Pagination};
pub use utils::{email, validation};
