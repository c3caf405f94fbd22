use gm_core::domain::entities::instructor::{InstructorApplication, VerificationStatus};
use gm_shared::Pagination;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InstructorApplicationRequest {
    #[validate(length(min = 1, max = 120))]
    pub headline: String,

    #[validate(length(min = 1, max = 5000))]
    pub bio: String,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub expertise: Vec<String>,
}

impl From<InstructorApplicationRequest> for InstructorApplication {
    fn from(request: InstructorApplicationRequest) -> Self {
        Self {
            headline: request.headline,
            bio: request.bio,
            expertise: request.expertise,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

/// Query string of the admin review queue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewQueueQuery {
    pub status: Option<VerificationStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ReviewQueueQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        )
    }
}
