//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use gm_core::domain::entities::user::{User, UserRole};
use gm_core::errors::{AuthError, DomainError};
use gm_core::repositories::UserRepository;

use super::{column, enum_column, is_unique_violation, uuid_column};

const SELECT_USER: &str = r#"
    SELECT id, name, email, password_hash, role, email_verified_at,
           is_two_factor_enabled, is_blocked, created_at, updated_at, last_login_at
    FROM users
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: uuid_column(row, "id")?,
            name: column(row, "name")?,
            email: column(row, "email")?,
            password_hash: column(row, "password_hash")?,
            role: enum_column::<UserRole>(row, "role")?,
            email_verified_at: column(row, "email_verified_at")?,
            is_two_factor_enabled: column(row, "is_two_factor_enabled")?,
            is_blocked: column(row, "is_blocked")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            last_login_at: column(row, "last_login_at")?,
        })
    }

    async fn fetch_one(&self, query: String, bind: String) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&query)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to fetch user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one(format!("{} WHERE email = ? LIMIT 1", SELECT_USER), email.to_string())
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.fetch_one(format!("{} WHERE id = ? LIMIT 1", SELECT_USER), id.to_string())
            .await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, name, email, password_hash, role, email_verified_at,
                is_two_factor_enabled, is_blocked, created_at, updated_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.email_verified_at)
            .bind(user.is_two_factor_enabled)
            .bind(user.is_blocked)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::UserAlreadyExists)
                } else {
                    DomainError::internal("Failed to create user", e)
                }
            })?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                name = ?, email = ?, password_hash = ?, role = ?, email_verified_at = ?,
                is_two_factor_enabled = ?, is_blocked = ?, updated_at = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.email_verified_at)
            .bind(user.is_two_factor_enabled)
            .bind(user.is_blocked)
            .bind(user.updated_at)
            .bind(user.last_login_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::UserAlreadyExists)
                } else {
                    DomainError::internal("Failed to update user", e)
                }
            })?;

        // MySQL reports zero affected rows when nothing changed, so check existence
        if result.rows_affected() == 0 && self.find_by_id(user.id).await?.is_none() {
            return Err(DomainError::not_found("User"));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to check email", e))?;

        let count: i64 = column(&row, "count")?;
        Ok(count > 0)
    }

    async fn count_by_role(&self, role: Option<UserRole>) -> Result<u64, DomainError> {
        let row = match role {
            Some(role) => {
                sqlx::query("SELECT COUNT(*) AS count FROM users WHERE role = ?")
                    .bind(role.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM users")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::internal("Failed to count users", e))?;

        let count: i64 = column(&row, "count")?;
        Ok(count as u64)
    }
}
