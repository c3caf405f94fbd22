//! Instructor verification workflow

use gm_shared::{PaginatedResponse, Pagination};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::instructor::{InstructorApplication, InstructorProfile, VerificationStatus};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{InstructorRepository, UserRepository};
use crate::services::access::{ensure_active, ensure_role};

const HEADLINE_MAX_LENGTH: usize = 120;
const BIO_MAX_LENGTH: usize = 5000;
const MAX_EXPERTISE: usize = 20;

/// Submission by instructors, review by admins
pub struct InstructorVerificationService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn InstructorRepository>,
}

impl InstructorVerificationService {
    pub fn new(users: Arc<dyn UserRepository>, profiles: Arc<dyn InstructorRepository>) -> Self {
        Self { users, profiles }
    }

    /// Submit or resubmit a profile for review
    ///
    /// # Errors
    ///
    /// * `InsufficientPermissions` - The caller is not an instructor
    /// * `EmailNotVerified` - The caller's email is unconfirmed
    /// * `BusinessRule` - The profile is already approved
    pub async fn submit(
        &self,
        user_id: Uuid,
        application: InstructorApplication,
    ) -> DomainResult<InstructorProfile> {
        let user = self.load_user(user_id).await?;
        ensure_active(&user)?;
        ensure_role(user.role, &[UserRole::Instructor])?;
        if !user.is_email_verified() {
            return Err(AuthError::EmailNotVerified.into());
        }
        validate_application(&application)?;

        let profile = match self.profiles.find_by_user_id(user_id).await? {
            Some(mut existing) => {
                existing.resubmit(application)?;
                self.profiles.update(existing).await?
            }
            None => {
                self.profiles
                    .save(InstructorProfile::submit(user_id, application))
                    .await?
            }
        };

        info!(
            event = "instructor_submitted",
            user_id = %user_id,
            profile_id = %profile.id,
            "Instructor profile submitted for review"
        );
        Ok(profile)
    }

    /// The caller's own profile
    pub async fn status(&self, user_id: Uuid) -> DomainResult<InstructorProfile> {
        self.profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Instructor profile"))
    }

    /// Profiles for the admin review queue
    pub async fn list_by_status(
        &self,
        status: Option<VerificationStatus>,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<InstructorProfile>> {
        let pagination = pagination.validate();
        let total = self.profiles.count_by_status(status).await?;
        let data = self.profiles.list_by_status(status, pagination).await?;
        Ok(PaginatedResponse::new(data, pagination, total))
    }

    pub async fn approve(&self, admin_id: Uuid, profile_id: Uuid) -> DomainResult<InstructorProfile> {
        self.ensure_admin(admin_id).await?;
        let mut profile = self.load_profile(profile_id).await?;
        profile.approve(admin_id)?;
        let profile = self.profiles.update(profile).await?;

        info!(
            event = "instructor_approved",
            profile_id = %profile_id,
            admin_id = %admin_id,
            "Instructor profile approved"
        );
        Ok(profile)
    }

    pub async fn reject(
        &self,
        admin_id: Uuid,
        profile_id: Uuid,
        reason: &str,
    ) -> DomainResult<InstructorProfile> {
        self.ensure_admin(admin_id).await?;
        let mut profile = self.load_profile(profile_id).await?;
        profile.reject(admin_id, reason)?;
        let profile = self.profiles.update(profile).await?;

        info!(
            event = "instructor_rejected",
            profile_id = %profile_id,
            admin_id = %admin_id,
            "Instructor profile rejected"
        );
        Ok(profile)
    }

    /// Whether the instructor is shown as verified to the public
    pub async fn is_publicly_trusted(&self, user_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .profiles
            .find_by_user_id(user_id)
            .await?
            .map(|p| p.is_publicly_trusted())
            .unwrap_or(false))
    }

    async fn ensure_admin(&self, admin_id: Uuid) -> DomainResult<()> {
        let admin = self.load_user(admin_id).await?;
        ensure_active(&admin)?;
        ensure_role(admin.role, &[UserRole::Admin])
    }

    async fn load_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    async fn load_profile(&self, profile_id: Uuid) -> DomainResult<InstructorProfile> {
        self.profiles
            .find_by_id(profile_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Instructor profile"))
    }
}

fn validate_application(application: &InstructorApplication) -> DomainResult<()> {
    let headline = application.headline.trim().chars().count();
    if headline == 0 || headline > HEADLINE_MAX_LENGTH {
        return Err(ValidationError::InvalidLength {
            field: "headline".to_string(),
            min: 1,
            max: HEADLINE_MAX_LENGTH,
        }
        .into());
    }
    let bio = application.bio.trim().chars().count();
    if bio == 0 || bio > BIO_MAX_LENGTH {
        return Err(ValidationError::InvalidLength {
            field: "bio".to_string(),
            min: 1,
            max: BIO_MAX_LENGTH,
        }
        .into());
    }
    if application.expertise.len() > MAX_EXPERTISE {
        return Err(ValidationError::InvalidLength {
            field: "expertise".to_string(),
            min: 0,
            max: MAX_EXPERTISE,
        }
        .into());
    }
    Ok(())
}
