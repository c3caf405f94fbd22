//! MySQL implementation of the TrustedDeviceRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use gm_core::domain::entities::trusted_device::TrustedDevice;
use gm_core::errors::DomainError;
use gm_core::repositories::TrustedDeviceRepository;

use super::{column, uuid_column};

const SELECT_DEVICE: &str = r#"
    SELECT id, user_id, token_hash, label, ip_address, created_at, last_used_at, expires_at
    FROM trusted_devices
"#;

pub struct MySqlTrustedDeviceRepository {
    pool: MySqlPool,
}

impl MySqlTrustedDeviceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_device(row: &MySqlRow) -> Result<TrustedDevice, DomainError> {
        Ok(TrustedDevice {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            token_hash: column(row, "token_hash")?,
            label: column(row, "label")?,
            ip_address: column(row, "ip_address")?,
            created_at: column(row, "created_at")?,
            last_used_at: column(row, "last_used_at")?,
            expires_at: column(row, "expires_at")?,
        })
    }
}

#[async_trait]
impl TrustedDeviceRepository for MySqlTrustedDeviceRepository {
    async fn save(&self, device: TrustedDevice) -> Result<TrustedDevice, DomainError> {
        let query = r#"
            INSERT INTO trusted_devices (
                id, user_id, token_hash, label, ip_address, created_at, last_used_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(device.id.to_string())
            .bind(device.user_id.to_string())
            .bind(&device.token_hash)
            .bind(&device.label)
            .bind(&device.ip_address)
            .bind(device.created_at)
            .bind(device.last_used_at)
            .bind(device.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to save trusted device", e))?;

        Ok(device)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TrustedDevice>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = ? LIMIT 1", SELECT_DEVICE))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to find trusted device", e))?;

        row.as_ref().map(Self::row_to_device).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TrustedDevice>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE user_id = ? AND expires_at > ? ORDER BY last_used_at DESC",
            SELECT_DEVICE
        ))
        .bind(user_id.to_string())
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to list trusted devices", e))?;

        rows.iter().map(Self::row_to_device).collect()
    }

    async fn touch(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("UPDATE trusted_devices SET last_used_at = ? WHERE id = ?")
            .bind(used_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to touch trusted device", e))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM trusted_devices WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete trusted device", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM trusted_devices WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete trusted devices", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM trusted_devices WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete expired trusted devices", e))?;

        Ok(result.rows_affected() as usize)
    }
}
