use chrono::{DateTime, Utc};
use gm_core::domain::entities::trusted_device::TrustedDevice;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub current_password: String,

    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailChangeRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
}

/// Password re-entry for sensitive two-factor changes; accounts without a
/// password omit it
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PasswordConfirmation {
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupCodesResponse {
    /// Shown once; only hashes are stored
    pub backup_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingBackupCodesResponse {
    pub remaining: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub id: Uuid,
    pub label: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whether the request came from this device
    pub current: bool,
}

impl DeviceResponse {
    pub fn new(device: TrustedDevice, current_device: Option<Uuid>) -> Self {
        Self {
            current: current_device == Some(device.id),
            id: device.id,
            label: device.label,
            ip_address: device.ip_address,
            created_at: device.created_at,
            last_used_at: device.last_used_at,
            expires_at: device.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedDevicesResponse {
    pub revoked: usize,
}
