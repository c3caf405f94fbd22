//! Trusted device issuing and checking

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::trusted_device::{TrustedDevice, DEFAULT_TRUST_DAYS, DEVICE_SECRET_BYTES};
use crate::domain::secrets;
use crate::domain::value_objects::IssuedDevice;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::TrustedDeviceRepository;

/// Issues device trust cookies and checks them on login
pub struct TrustedDeviceService {
    repository: Arc<dyn TrustedDeviceRepository>,
    trust_period: Duration,
}

impl TrustedDeviceService {
    pub fn new(repository: Arc<dyn TrustedDeviceRepository>, trust_days: i64) -> Self {
        let days = if trust_days > 0 { trust_days } else { DEFAULT_TRUST_DAYS };
        Self {
            repository,
            trust_period: Duration::days(days),
        }
    }

    /// Trust the current browser of a user
    ///
    /// The returned cookie value holds the only copy of the device secret.
    pub async fn trust(
        &self,
        user_id: Uuid,
        label: Option<String>,
        ip_address: Option<String>,
    ) -> DomainResult<IssuedDevice> {
        let secret = secrets::random_url_token(DEVICE_SECRET_BYTES);
        let device = TrustedDevice::new(
            user_id,
            secrets::sha256_hex(&secret),
            label,
            ip_address,
            self.trust_period,
        );
        let device = self.repository.save(device).await?;

        info!(
            event = "device_trusted",
            user_id = %user_id,
            device_id = %device.id,
            "Device trusted for two-factor login"
        );

        Ok(IssuedDevice {
            device_id: device.id,
            cookie_value: device.cookie_value(&secret),
            expires_at: device.expires_at,
        })
    }

    /// Whether a cookie proves a trusted device of this user
    ///
    /// Malformed cookies, cookies of other users and hash mismatches are
    /// simply not trusted. Expired devices are deleted on sight.
    pub async fn is_trusted(&self, user_id: Uuid, cookie_value: &str) -> DomainResult<bool> {
        let Some((device_id, secret)) = TrustedDevice::parse_cookie(cookie_value) else {
            return Ok(false);
        };

        let Some(device) = self.repository.find_by_id(device_id).await? else {
            return Ok(false);
        };

        if device.user_id != user_id {
            warn!(
                event = "device_cookie_mismatch",
                user_id = %user_id,
                device_id = %device_id,
                "Trusted-device cookie presented for another user"
            );
            return Ok(false);
        }

        if device.is_expired() {
            self.repository.delete(device.id).await?;
            return Ok(false);
        }

        if !secrets::hashes_match(&device.token_hash, &secrets::sha256_hex(secret)) {
            warn!(
                event = "device_cookie_invalid",
                user_id = %user_id,
                device_id = %device_id,
                "Trusted-device cookie secret did not match"
            );
            return Ok(false);
        }

        self.repository.touch(device.id, Utc::now()).await?;
        Ok(true)
    }

    /// Unexpired devices of a user
    pub async fn list(&self, user_id: Uuid) -> DomainResult<Vec<TrustedDevice>> {
        self.repository.list_for_user(user_id).await
    }

    /// Revoke one of the user's own devices
    pub async fn revoke(&self, user_id: Uuid, device_id: Uuid) -> DomainResult<()> {
        match self.repository.find_by_id(device_id).await? {
            Some(device) if device.user_id == user_id => {
                self.repository.delete(device_id).await?;
                info!(event = "device_revoked", user_id = %user_id, device_id = %device_id, "Trusted device revoked");
                Ok(())
            }
            _ => Err(DomainError::not_found("Trusted device")),
        }
    }

    pub async fn revoke_all(&self, user_id: Uuid) -> DomainResult<usize> {
        let count = self.repository.delete_all_for_user(user_id).await?;
        if count > 0 {
            info!(event = "devices_revoked", user_id = %user_id, count, "All trusted devices revoked");
        }
        Ok(count)
    }
}
