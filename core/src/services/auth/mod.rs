//! Authentication service module
//!
//! This module provides the complete authentication system including:
//! - Registration with email verification
//! - Login with optional two-factor codes, backup codes and trusted devices
//! - Token refresh and logout
//! - Password reset, set and change flows
//! - Rate limiting of login failures and outbound mail

mod config;
mod password;
mod rate_limiter;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::PasswordHasher;
pub use rate_limiter::{RateLimitScope, RateLimiterTrait};
pub use service::{AuthDependencies, AuthService};
pub use types::{LoginRequest, RegisterRequest};
