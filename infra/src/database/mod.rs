//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - One repository per core repository trait
//! - Embedded schema migrations

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlBackupCodeRepository, MySqlInstructorRepository, MySqlTokenRepository,
    MySqlTrustedDeviceRepository, MySqlUserRepository, MySqlVerificationTokenRepository,
};
