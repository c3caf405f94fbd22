//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh tokens are stored by SHA-256 hash only; the blacklist holds the
//! `jti` of logged-out access tokens until they would have expired anyway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use gm_core::domain::entities::token::RefreshToken;
use gm_core::errors::DomainError;
use gm_core::repositories::TokenRepository;

use super::{column, is_unique_violation, uuid_column};

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &MySqlRow) -> Result<RefreshToken, DomainError> {
        Ok(RefreshToken {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            token_hash: column(row, "token_hash")?,
            token_family: column(row, "token_family")?,
            created_at: column(row, "created_at")?,
            expires_at: column(row, "expires_at")?,
            is_revoked: column(row, "is_revoked")?,
        })
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, token_family, created_at, expires_at, is_revoked
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(&token.token_family)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.is_revoked)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Validation {
                        message: "Token already exists".to_string(),
                    }
                } else {
                    DomainError::internal("Failed to save refresh token", e)
                }
            })?;

        Ok(token)
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, token_family, created_at, expires_at, is_revoked
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, token_family, created_at, expires_at, is_revoked
            FROM refresh_tokens
            WHERE user_id = ?
                AND is_revoked = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to find user tokens", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn revoke_token(&self, token_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE WHERE token_hash = ? AND is_revoked = FALSE",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to revoke token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE WHERE user_id = ? AND is_revoked = FALSE",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to revoke user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn revoke_token_family(&self, token_family: &str) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE WHERE token_family = ? AND is_revoked = FALSE",
        )
        .bind(token_family)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to revoke token family", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete expired tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE expires_at = VALUES(expires_at)",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::internal("Failed to blacklist token", e))?;

        Ok(())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM token_blacklist WHERE jti = ?")
            .bind(jti)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to check blacklist", e))?;

        let count: i64 = column(&row, "count")?;
        Ok(count > 0)
    }

    async fn cleanup_blacklist(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to clean up blacklist", e))?;

        Ok(result.rows_affected() as usize)
    }
}
