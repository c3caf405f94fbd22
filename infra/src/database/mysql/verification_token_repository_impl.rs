//! MySQL implementation of the VerificationTokenRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use gm_core::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use gm_core::errors::DomainError;
use gm_core::repositories::VerificationTokenRepository;

use super::{column, enum_column, optional_uuid_column, uuid_column};

const SELECT_TOKEN: &str = r#"
    SELECT id, email, user_id, token_hash, purpose, attempts, created_at, expires_at
    FROM verification_tokens
"#;

pub struct MySqlVerificationTokenRepository {
    pool: MySqlPool,
}

impl MySqlVerificationTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &MySqlRow) -> Result<VerificationToken, DomainError> {
        Ok(VerificationToken {
            id: uuid_column(row, "id")?,
            email: column(row, "email")?,
            user_id: optional_uuid_column(row, "user_id")?,
            token_hash: column(row, "token_hash")?,
            purpose: enum_column::<TokenPurpose>(row, "purpose")?,
            attempts: column(row, "attempts")?,
            created_at: column(row, "created_at")?,
            expires_at: column(row, "expires_at")?,
        })
    }
}

#[async_trait]
impl VerificationTokenRepository for MySqlVerificationTokenRepository {
    async fn save(&self, token: VerificationToken) -> Result<VerificationToken, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::internal("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM verification_tokens WHERE email = ? AND purpose = ?")
            .bind(&token.email)
            .bind(token.purpose.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::internal("Failed to replace verification token", e))?;

        let query = r#"
            INSERT INTO verification_tokens (
                id, email, user_id, token_hash, purpose, attempts, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(&token.email)
            .bind(token.user_id.map(|id| id.to_string()))
            .bind(&token.token_hash)
            .bind(token.purpose.as_str())
            .bind(token.attempts)
            .bind(token.created_at)
            .bind(token.expires_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::internal("Failed to save verification token", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::internal("Failed to commit verification token", e))?;

        Ok(token)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE token_hash = ? AND purpose = ? LIMIT 1",
            SELECT_TOKEN
        ))
        .bind(token_hash)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to find verification token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_latest(
        &self,
        email: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE email = ? AND purpose = ? ORDER BY created_at DESC LIMIT 1",
            SELECT_TOKEN
        ))
        .bind(email)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to find verification token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<u32, DomainError> {
        sqlx::query("UPDATE verification_tokens SET attempts = attempts + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to record attempt", e))?;

        let row = sqlx::query("SELECT attempts FROM verification_tokens WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to read attempts", e))?
            .ok_or_else(|| DomainError::not_found("Verification token"))?;

        column(&row, "attempts")
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete verification token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete expired verification tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
