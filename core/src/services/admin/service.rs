use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::access::{ensure_active, ensure_role};
use crate::services::token::TokenService;
use crate::services::trusted_device::TrustedDeviceService;

/// Blocks and unblocks accounts on behalf of admins
pub struct AdminUserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    devices: Arc<TrustedDeviceService>,
}

impl AdminUserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        devices: Arc<TrustedDeviceService>,
    ) -> Self {
        Self {
            users,
            tokens,
            devices,
        }
    }

    /// Block an account and end every session it holds
    ///
    /// Outstanding access tokens stay valid until expiry, but refresh fails
    /// for blocked users and login is refused.
    pub async fn block_user(&self, admin_id: Uuid, user_id: Uuid) -> DomainResult<User> {
        self.ensure_admin(admin_id).await?;
        if admin_id == user_id {
            return Err(DomainError::BusinessRule {
                message: "Admins cannot block themselves".to_string(),
            });
        }

        let mut user = self.load_user(user_id).await?;
        if !user.is_blocked {
            user.block();
            user = self.users.update(user).await?;
        }

        let revoked_tokens = self.tokens.revoke_tokens(user_id).await?;
        let revoked_devices = self.devices.revoke_all(user_id).await?;

        warn!(
            event = "user_blocked",
            user_id = %user_id,
            admin_id = %admin_id,
            revoked_tokens,
            revoked_devices,
            "User blocked by admin"
        );
        Ok(user)
    }

    pub async fn unblock_user(&self, admin_id: Uuid, user_id: Uuid) -> DomainResult<User> {
        self.ensure_admin(admin_id).await?;

        let mut user = self.load_user(user_id).await?;
        if user.is_blocked {
            user.unblock();
            user = self.users.update(user).await?;
        }

        info!(
            event = "user_unblocked",
            user_id = %user_id,
            admin_id = %admin_id,
            "User unblocked by admin"
        );
        Ok(user)
    }

    async fn ensure_admin(&self, admin_id: Uuid) -> DomainResult<()> {
        let admin = self.load_user(admin_id).await?;
        ensure_active(&admin)?;
        ensure_role(admin.role, &[UserRole::Admin])
    }

    async fn load_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }
}
