//! Token service module for JWT management
//!
//! This module handles all session token operations including:
//! - JWT access token generation and verification
//! - Refresh token rotation with reuse detection
//! - Access token blacklisting on logout
//! - Background cleanup of expired records

mod cleanup;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use service::TokenService;
