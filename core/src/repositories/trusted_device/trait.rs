//! Trusted device repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::trusted_device::TrustedDevice;
use crate::errors::DomainError;

/// Persistence for devices that skip the second factor
#[async_trait]
pub trait TrustedDeviceRepository: Send + Sync {
    /// Store a newly trusted device
    async fn save(&self, device: TrustedDevice) -> Result<TrustedDevice, DomainError>;

    /// Find a device by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TrustedDevice>, DomainError>;

    /// Unexpired devices of a user, most recently used first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TrustedDevice>, DomainError>;

    /// Record a login from the device
    async fn touch(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Delete a device; returns whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete every device of a user
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete devices whose trust period is over
    async fn delete_expired(&self) -> Result<usize, DomainError>;
}
