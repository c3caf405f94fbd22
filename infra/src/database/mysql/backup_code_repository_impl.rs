//! MySQL implementation of the BackupCodeRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use gm_core::domain::entities::backup_code::BackupCode;
use gm_core::errors::DomainError;
use gm_core::repositories::BackupCodeRepository;

use super::{column, uuid_column};

pub struct MySqlBackupCodeRepository {
    pool: MySqlPool,
}

impl MySqlBackupCodeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_code(row: &MySqlRow) -> Result<BackupCode, DomainError> {
        Ok(BackupCode {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            code_hash: column(row, "code_hash")?,
            created_at: column(row, "created_at")?,
            used_at: column(row, "used_at")?,
        })
    }
}

#[async_trait]
impl BackupCodeRepository for MySqlBackupCodeRepository {
    async fn replace_all(&self, user_id: Uuid, codes: Vec<BackupCode>) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::internal("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM backup_codes WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::internal("Failed to delete backup codes", e))?;

        for code in &codes {
            sqlx::query(
                "INSERT INTO backup_codes (id, user_id, code_hash, created_at, used_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(code.id.to_string())
            .bind(user_id.to_string())
            .bind(&code.code_hash)
            .bind(code.created_at)
            .bind(code.used_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::internal("Failed to save backup code", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::internal("Failed to commit backup codes", e))
    }

    async fn find_unused(&self, user_id: Uuid, code_hash: &str) -> Result<Option<BackupCode>, DomainError> {
        let row = sqlx::query(
            "SELECT id, user_id, code_hash, created_at, used_at FROM backup_codes \
             WHERE user_id = ? AND code_hash = ? AND used_at IS NULL LIMIT 1",
        )
        .bind(user_id.to_string())
        .bind(code_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to find backup code", e))?;

        row.as_ref().map(Self::row_to_code).transpose()
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, DomainError> {
        // The IS NULL guard makes concurrent use of one code succeed only once
        let result = sqlx::query("UPDATE backup_codes SET used_at = ? WHERE id = ? AND used_at IS NULL")
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to mark backup code used", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_unused(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM backup_codes WHERE user_id = ? AND used_at IS NULL",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to count backup codes", e))?;

        let count: i64 = column(&row, "count")?;
        Ok(count as usize)
    }

    async fn delete_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM backup_codes WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete backup codes", e))?;

        Ok(result.rows_affected() as usize)
    }
}
