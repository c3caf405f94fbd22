//! Mailed verification tokens and two-factor codes
//!
//! Link tokens confirm an email address or authorize a password reset/set.
//! Two-factor codes are 6-digit codes with attempt tracking and a resend
//! cooldown.

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::VerificationTokenService;
pub use types::IssuedCode;
