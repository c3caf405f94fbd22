//! Verification token repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use crate::errors::DomainError;

/// Persistence for mailed single-use tokens and two-factor codes
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Store a token, deleting any previous token for the same email and purpose
    async fn save(&self, token: VerificationToken) -> Result<VerificationToken, DomainError>;

    /// Find a token by its hash and purpose
    async fn find_by_hash(
        &self,
        token_hash: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError>;

    /// Find the newest token for an email and purpose
    async fn find_latest(
        &self,
        email: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError>;

    /// Record a wrong attempt, returning the new attempt count
    async fn increment_attempts(&self, id: Uuid) -> Result<u32, DomainError>;

    /// Delete a token; returns whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete expired tokens of any purpose
    async fn delete_expired(&self) -> Result<usize, DomainError>;
}
