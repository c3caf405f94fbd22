//! Instructor profile repository trait.

use async_trait::async_trait;
use gm_shared::Pagination;
use uuid::Uuid;

use crate::domain::entities::instructor::{InstructorProfile, VerificationStatus};
use crate::errors::DomainError;

/// Persistence for instructor verification profiles
#[async_trait]
pub trait InstructorRepository: Send + Sync {
    /// Profile of a user, one per user at most
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<InstructorProfile>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InstructorProfile>, DomainError>;

    /// Insert a new profile
    ///
    /// # Errors
    /// * `BusinessRule` - The user already has a profile
    async fn save(&self, profile: InstructorProfile) -> Result<InstructorProfile, DomainError>;

    /// Overwrite an existing profile
    async fn update(&self, profile: InstructorProfile) -> Result<InstructorProfile, DomainError>;

    /// Profiles filtered by status, oldest submission first
    async fn list_by_status(
        &self,
        status: Option<VerificationStatus>,
        pagination: Pagination,
    ) -> Result<Vec<InstructorProfile>, DomainError>;

    async fn count_by_status(&self, status: Option<VerificationStatus>) -> Result<u64, DomainError>;
}
