//! In-memory implementation of TrustedDeviceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::trusted_device::TrustedDevice;
use crate::errors::DomainError;

use super::trait_::TrustedDeviceRepository;

/// Process-local trusted device store
#[derive(Clone, Default)]
pub struct InMemoryTrustedDeviceRepository {
    devices: Arc<RwLock<HashMap<Uuid, TrustedDevice>>>,
}

impl InMemoryTrustedDeviceRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrustedDeviceRepository for InMemoryTrustedDeviceRepository {
    async fn save(&self, device: TrustedDevice) -> Result<TrustedDevice, DomainError> {
        let mut devices = self.devices.write().await;
        devices.insert(device.id, device.clone());
        Ok(device)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TrustedDevice>, DomainError> {
        let devices = self.devices.read().await;
        Ok(devices.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TrustedDevice>, DomainError> {
        let devices = self.devices.read().await;
        let mut list: Vec<TrustedDevice> = devices
            .values()
            .filter(|d| d.user_id == user_id && !d.is_expired())
            .cloned()
            .collect();
        list.sort_by(|a, b| b.last_used_at.cmp(&a.last_used_at));
        Ok(list)
    }

    async fn touch(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut devices = self.devices.write().await;
        if let Some(device) = devices.get_mut(&id) {
            device.last_used_at = used_at;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut devices = self.devices.write().await;
        Ok(devices.remove(&id).is_some())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut devices = self.devices.write().await;
        let before = devices.len();
        devices.retain(|_, d| d.user_id != user_id);
        Ok(before - devices.len())
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let mut devices = self.devices.write().await;
        let before = devices.len();
        devices.retain(|_, d| !d.is_expired());
        Ok(before - devices.len())
    }
}
