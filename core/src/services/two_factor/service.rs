//! Enabling and disabling two-factor login, backup code management

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::backup_code::BackupCode;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{BackupCodeRepository, UserRepository};
use crate::services::auth::PasswordHasher;
use crate::services::trusted_device::TrustedDeviceService;

/// Default size of a backup code set
pub const DEFAULT_BACKUP_CODE_COUNT: usize = 10;

pub struct TwoFactorService {
    users: Arc<dyn UserRepository>,
    backup_codes: Arc<dyn BackupCodeRepository>,
    devices: Arc<TrustedDeviceService>,
    hasher: PasswordHasher,
    backup_code_count: usize,
}

impl TwoFactorService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        backup_codes: Arc<dyn BackupCodeRepository>,
        devices: Arc<TrustedDeviceService>,
        hasher: PasswordHasher,
        backup_code_count: usize,
    ) -> Self {
        Self {
            users,
            backup_codes,
            devices,
            hasher,
            backup_code_count: if backup_code_count == 0 {
                DEFAULT_BACKUP_CODE_COUNT
            } else {
                backup_code_count
            },
        }
    }

    /// Turn on two-factor login
    ///
    /// # Returns
    ///
    /// The plaintext backup codes; they are not retrievable later
    pub async fn enable(&self, user_id: Uuid, password: Option<&str>) -> DomainResult<Vec<String>> {
        let mut user = self.load_user(user_id).await?;
        if !user.is_email_verified() {
            return Err(AuthError::EmailNotVerified.into());
        }
        self.confirm_password(&user, password).await?;

        if user.is_two_factor_enabled {
            return Err(DomainError::BusinessRule {
                message: "Two-factor authentication is already enabled".to_string(),
            });
        }

        user.enable_two_factor();
        self.users.update(user).await?;
        let codes = self.replace_backup_codes(user_id).await?;

        info!(event = "two_factor_enabled", user_id = %user_id, "Two-factor authentication enabled");
        Ok(codes)
    }

    /// Turn off two-factor login, dropping backup codes and trusted devices
    pub async fn disable(&self, user_id: Uuid, password: Option<&str>) -> DomainResult<()> {
        let mut user = self.load_user(user_id).await?;
        self.confirm_password(&user, password).await?;

        user.disable_two_factor();
        self.users.update(user).await?;
        self.backup_codes.delete_all(user_id).await?;
        self.devices.revoke_all(user_id).await?;

        info!(event = "two_factor_disabled", user_id = %user_id, "Two-factor authentication disabled");
        Ok(())
    }

    /// Replace the backup code set
    pub async fn regenerate_backup_codes(
        &self,
        user_id: Uuid,
        password: Option<&str>,
    ) -> DomainResult<Vec<String>> {
        let user = self.load_user(user_id).await?;
        self.confirm_password(&user, password).await?;

        if !user.is_two_factor_enabled {
            return Err(DomainError::BusinessRule {
                message: "Two-factor authentication is not enabled".to_string(),
            });
        }

        let codes = self.replace_backup_codes(user_id).await?;
        info!(event = "backup_codes_regenerated", user_id = %user_id, "Backup codes regenerated");
        Ok(codes)
    }

    pub async fn remaining_backup_codes(&self, user_id: Uuid) -> DomainResult<usize> {
        self.backup_codes.count_unused(user_id).await
    }

    /// Redeem a backup code; returns false when it is unknown or already used
    pub async fn consume_backup_code(&self, user_id: Uuid, code: &str) -> DomainResult<bool> {
        let Some(stored) = self
            .backup_codes
            .find_unused(user_id, &BackupCode::hash(code))
            .await?
        else {
            return Ok(false);
        };

        let redeemed = self.backup_codes.mark_used(stored.id).await?;
        if redeemed {
            let remaining = self.backup_codes.count_unused(user_id).await.unwrap_or(0);
            info!(
                event = "backup_code_used",
                user_id = %user_id,
                remaining,
                "Backup code redeemed"
            );
        }
        Ok(redeemed)
    }

    async fn replace_backup_codes(&self, user_id: Uuid) -> DomainResult<Vec<String>> {
        let plaintexts: Vec<String> = (0..self.backup_code_count)
            .map(|_| BackupCode::generate_plaintext())
            .collect();
        let codes = plaintexts
            .iter()
            .map(|code| BackupCode::new(user_id, code))
            .collect();
        self.backup_codes.replace_all(user_id, codes).await?;
        Ok(plaintexts)
    }

    async fn load_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Accounts with a password must confirm it; password-less accounts skip this
    async fn confirm_password(&self, user: &User, password: Option<&str>) -> DomainResult<()> {
        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(());
        };
        let candidate = password.ok_or(AuthError::InvalidCredentials)?;
        if self.hasher.verify(candidate, hash).await? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
