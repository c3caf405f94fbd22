//! bcrypt password hashing
//!
//! Hashing runs on the blocking pool since bcrypt at production cost takes
//! hundreds of milliseconds.

use gm_shared::validation::validate_password;

use crate::errors::{DomainError, DomainResult, ValidationError};

/// bcrypt hasher with a fixed cost factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Check the password policy, then hash
    pub async fn hash(&self, password: &str) -> DomainResult<String> {
        validate_password(password)
            .map_err(|message| DomainError::ValidationErr(ValidationError::WeakPassword { message }))?;

        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::internal("password hashing task", e))?
            .map_err(|e| DomainError::internal("password hashing", e))
    }

    /// Compare a candidate against a stored hash; malformed hashes never match
    pub async fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|e| DomainError::internal("password verification task", e))
    }
}
