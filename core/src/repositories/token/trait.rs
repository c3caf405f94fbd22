//! Token repository trait defining the interface for refresh token persistence
//! and the access token blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken entity persistence operations
///
/// # Security Considerations
/// - Tokens are hashed before storage
/// - Expired tokens are periodically cleaned up
/// - Revoked tokens are immediately invalidated
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token to the repository
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its hashed value
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found, whatever its state
    /// * `Ok(None)` - No token found with given hash
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Find all valid (non-expired, non-revoked) refresh tokens for a user
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Revoke a specific refresh token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was revoked
    /// * `Ok(false)` - Token not found or already revoked
    async fn revoke_token(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke all refresh tokens for a user, returning how many were revoked
    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Revoke every token of a rotation family (reuse detection)
    async fn revoke_token_family(&self, token_family: &str) -> Result<usize, DomainError>;

    /// Delete expired refresh tokens, returning how many were deleted
    async fn delete_expired_tokens(&self) -> Result<usize, DomainError>;

    /// Add an access token id to the blacklist until it would have expired
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Check whether an access token id is blacklisted
    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, DomainError>;

    /// Remove blacklist entries whose tokens have expired anyway
    async fn cleanup_blacklist(&self) -> Result<usize, DomainError>;
}
