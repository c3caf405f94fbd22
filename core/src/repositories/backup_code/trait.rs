//! Backup code repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::backup_code::BackupCode;
use crate::errors::DomainError;

/// Persistence for two-factor backup codes
#[async_trait]
pub trait BackupCodeRepository: Send + Sync {
    /// Replace the whole code set of a user
    async fn replace_all(&self, user_id: Uuid, codes: Vec<BackupCode>) -> Result<(), DomainError>;

    /// Find an unused code of a user by its hash
    async fn find_unused(&self, user_id: Uuid, code_hash: &str) -> Result<Option<BackupCode>, DomainError>;

    /// Mark a code as used
    ///
    /// # Returns
    /// * `Ok(true)` - The code was unused and is now redeemed
    /// * `Ok(false)` - The code does not exist or was already redeemed
    async fn mark_used(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Number of unused codes left for a user
    async fn count_unused(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete all codes of a user
    async fn delete_all(&self, user_id: Uuid) -> Result<usize, DomainError>;
}
