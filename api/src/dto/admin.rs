use gm_core::domain::entities::user::User;
use gm_core::domain::value_objects::UserProfile;
use serde::{Deserialize, Serialize};

/// User as seen by moderators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratedUserResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub is_blocked: bool,
}

impl From<&User> for ModeratedUserResponse {
    fn from(user: &User) -> Self {
        Self {
            profile: UserProfile::from(user),
            is_blocked: user.is_blocked,
        }
    }
}
