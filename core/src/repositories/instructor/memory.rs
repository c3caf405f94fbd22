//! In-memory implementation of InstructorRepository

use async_trait::async_trait;
use gm_shared::Pagination;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::instructor::{InstructorProfile, VerificationStatus};
use crate::errors::DomainError;

use super::trait_::InstructorRepository;

#[derive(Clone, Default)]
pub struct InMemoryInstructorRepository {
    profiles: Arc<RwLock<HashMap<Uuid, InstructorProfile>>>,
}

impl InMemoryInstructorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn status_matches(profile: &InstructorProfile, status: Option<VerificationStatus>) -> bool {
    status.map_or(true, |s| profile.status == s)
}

#[async_trait]
impl InstructorRepository for InMemoryInstructorRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<InstructorProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.user_id == user_id).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InstructorProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&id).cloned())
    }

    async fn save(&self, profile: InstructorProfile) -> Result<InstructorProfile, DomainError> {
        let mut profiles = self.profiles.write().await;
        if profiles.values().any(|p| p.user_id == profile.user_id) {
            return Err(DomainError::BusinessRule {
                message: "Instructor profile already exists".to_string(),
            });
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: InstructorProfile) -> Result<InstructorProfile, DomainError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id) {
            return Err(DomainError::not_found("Instructor profile"));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn list_by_status(
        &self,
        status: Option<VerificationStatus>,
        pagination: Pagination,
    ) -> Result<Vec<InstructorProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        let mut list: Vec<InstructorProfile> = profiles
            .values()
            .filter(|p| status_matches(p, status))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(list
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }

    async fn count_by_status(&self, status: Option<VerificationStatus>) -> Result<u64, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().filter(|p| status_matches(p, status)).count() as u64)
    }
}
