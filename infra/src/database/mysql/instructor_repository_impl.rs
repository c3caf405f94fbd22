//! MySQL implementation of the InstructorRepository trait.
//!
//! Expertise tags are stored as a JSON array in a TEXT column.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use gm_core::domain::entities::instructor::{InstructorProfile, VerificationStatus};
use gm_core::errors::DomainError;
use gm_core::repositories::InstructorRepository;
use gm_shared::Pagination;

use super::{column, enum_column, is_unique_violation, optional_uuid_column, uuid_column};

const SELECT_PROFILE: &str = r#"
    SELECT id, user_id, headline, bio, expertise, status, rejection_reason,
           submitted_at, reviewed_at, reviewed_by
    FROM instructor_profiles
"#;

pub struct MySqlInstructorRepository {
    pool: MySqlPool,
}

impl MySqlInstructorRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_profile(row: &MySqlRow) -> Result<InstructorProfile, DomainError> {
        let expertise: String = column(row, "expertise")?;
        Ok(InstructorProfile {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            headline: column(row, "headline")?,
            bio: column(row, "bio")?,
            expertise: serde_json::from_str(&expertise)
                .map_err(|e| DomainError::internal("Invalid expertise column", e))?,
            status: enum_column::<VerificationStatus>(row, "status")?,
            rejection_reason: column(row, "rejection_reason")?,
            submitted_at: column(row, "submitted_at")?,
            reviewed_at: column(row, "reviewed_at")?,
            reviewed_by: optional_uuid_column(row, "reviewed_by")?,
        })
    }

    fn expertise_json(profile: &InstructorProfile) -> Result<String, DomainError> {
        serde_json::to_string(&profile.expertise)
            .map_err(|e| DomainError::internal("Failed to encode expertise", e))
    }
}

#[async_trait]
impl InstructorRepository for MySqlInstructorRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<InstructorProfile>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE user_id = ? LIMIT 1", SELECT_PROFILE))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to find instructor profile", e))?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InstructorProfile>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = ? LIMIT 1", SELECT_PROFILE))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to find instructor profile", e))?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn save(&self, profile: InstructorProfile) -> Result<InstructorProfile, DomainError> {
        let query = r#"
            INSERT INTO instructor_profiles (
                id, user_id, headline, bio, expertise, status, rejection_reason,
                submitted_at, reviewed_at, reviewed_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(profile.id.to_string())
            .bind(profile.user_id.to_string())
            .bind(&profile.headline)
            .bind(&profile.bio)
            .bind(Self::expertise_json(&profile)?)
            .bind(profile.status.as_str())
            .bind(&profile.rejection_reason)
            .bind(profile.submitted_at)
            .bind(profile.reviewed_at)
            .bind(profile.reviewed_by.map(|id| id.to_string()))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::BusinessRule {
                        message: "Instructor profile already exists".to_string(),
                    }
                } else {
                    DomainError::internal("Failed to save instructor profile", e)
                }
            })?;

        Ok(profile)
    }

    async fn update(&self, profile: InstructorProfile) -> Result<InstructorProfile, DomainError> {
        let query = r#"
            UPDATE instructor_profiles SET
                headline = ?, bio = ?, expertise = ?, status = ?, rejection_reason = ?,
                submitted_at = ?, reviewed_at = ?, reviewed_by = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&profile.headline)
            .bind(&profile.bio)
            .bind(Self::expertise_json(&profile)?)
            .bind(profile.status.as_str())
            .bind(&profile.rejection_reason)
            .bind(profile.submitted_at)
            .bind(profile.reviewed_at)
            .bind(profile.reviewed_by.map(|id| id.to_string()))
            .bind(profile.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::internal("Failed to update instructor profile", e))?;

        if result.rows_affected() == 0 && self.find_by_id(profile.id).await?.is_none() {
            return Err(DomainError::not_found("Instructor profile"));
        }

        Ok(profile)
    }

    async fn list_by_status(
        &self,
        status: Option<VerificationStatus>,
        pagination: Pagination,
    ) -> Result<Vec<InstructorProfile>, DomainError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE status = ? ORDER BY submitted_at ASC LIMIT ? OFFSET ?",
                    SELECT_PROFILE
                ))
                .bind(status.as_str())
                .bind(pagination.limit())
                .bind(pagination.offset())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "{} ORDER BY submitted_at ASC LIMIT ? OFFSET ?",
                    SELECT_PROFILE
                ))
                .bind(pagination.limit())
                .bind(pagination.offset())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::internal("Failed to list instructor profiles", e))?;

        rows.iter().map(Self::row_to_profile).collect()
    }

    async fn count_by_status(&self, status: Option<VerificationStatus>) -> Result<u64, DomainError> {
        let row = match status {
            Some(status) => {
                sqlx::query("SELECT COUNT(*) AS count FROM instructor_profiles WHERE status = ?")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM instructor_profiles")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::internal("Failed to count instructor profiles", e))?;

        let count: i64 = column(&row, "count")?;
        Ok(count as u64)
    }
}
