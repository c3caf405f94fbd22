//! Instructor verification profile reviewed by admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Review state of an instructor profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Waiting for an admin decision
    Pending,
    /// Publicly trusted instructor
    Approved,
    /// Declined; the instructor may resubmit
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "PENDING",
            VerificationStatus::Approved => "APPROVED",
            VerificationStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(VerificationStatus::Pending),
            "APPROVED" => Ok(VerificationStatus::Approved),
            "REJECTED" => Ok(VerificationStatus::Rejected),
            _ => Err(format!("Invalid verification status: {}", s)),
        }
    }
}

/// Data an instructor submits for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorApplication {
    pub headline: String,
    pub bio: String,
    pub expertise: Vec<String>,
}

/// Instructor profile with its review state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorProfile {
    /// Unique identifier
    pub id: Uuid,

    /// Instructor account
    pub user_id: Uuid,

    /// Short professional headline
    pub headline: String,

    /// Longer biography
    pub bio: String,

    /// Subjects the instructor teaches
    pub expertise: Vec<String>,

    /// Review state
    pub status: VerificationStatus,

    /// Reason given with the last rejection
    pub rejection_reason: Option<String>,

    /// Last (re)submission time
    pub submitted_at: DateTime<Utc>,

    /// Last review time
    pub reviewed_at: Option<DateTime<Utc>>,

    /// Admin who made the last decision
    pub reviewed_by: Option<Uuid>,
}

impl InstructorProfile {
    /// Creates a pending profile from a first submission
    pub fn submit(user_id: Uuid, application: InstructorApplication) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            headline: application.headline.trim().to_string(),
            bio: application.bio.trim().to_string(),
            expertise: normalize_expertise(application.expertise),
            status: VerificationStatus::Pending,
            rejection_reason: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    /// Applies a new submission to an existing profile.
    ///
    /// Pending profiles are edited in place, rejected profiles go back to
    /// pending, approved profiles cannot be resubmitted.
    pub fn resubmit(&mut self, application: InstructorApplication) -> DomainResult<()> {
        if self.status == VerificationStatus::Approved {
            return Err(DomainError::BusinessRule {
                message: "Instructor profile is already approved".to_string(),
            });
        }

        self.headline = application.headline.trim().to_string();
        self.bio = application.bio.trim().to_string();
        self.expertise = normalize_expertise(application.expertise);
        self.status = VerificationStatus::Pending;
        self.rejection_reason = None;
        self.submitted_at = Utc::now();
        Ok(())
    }

    /// Approves a pending profile
    pub fn approve(&mut self, admin_id: Uuid) -> DomainResult<()> {
        self.ensure_pending()?;
        self.status = VerificationStatus::Approved;
        self.rejection_reason = None;
        self.reviewed_at = Some(Utc::now());
        self.reviewed_by = Some(admin_id);
        Ok(())
    }

    /// Rejects a pending profile; a non-empty reason is required
    pub fn reject(&mut self, admin_id: Uuid, reason: &str) -> DomainResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::Validation {
                message: "A rejection reason is required".to_string(),
            });
        }
        self.ensure_pending()?;
        self.status = VerificationStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.reviewed_at = Some(Utc::now());
        self.reviewed_by = Some(admin_id);
        Ok(())
    }

    /// Only approved instructors are shown as trusted
    pub fn is_publicly_trusted(&self) -> bool {
        self.status == VerificationStatus::Approved
    }

    fn ensure_pending(&self) -> DomainResult<()> {
        if self.status != VerificationStatus::Pending {
            return Err(DomainError::BusinessRule {
                message: format!("Instructor profile is {}, not PENDING", self.status),
            });
        }
        Ok(())
    }
}

fn normalize_expertise(expertise: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(expertise.len());
    for item in expertise {
        let item = item.trim().to_string();
        if !item.is_empty() && !normalized.iter().any(|e| e.eq_ignore_ascii_case(&item)) {
            normalized.push(item);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> InstructorApplication {
        InstructorApplication {
            headline: " Guitar teacher ".to_string(),
            bio: "Fifteen years of teaching".to_string(),
            expertise: vec!["Guitar".to_string(), "guitar".to_string(), " ".to_string()],
        }
    }

    #[test]
    fn test_submit_is_pending() {
        let profile = InstructorProfile::submit(Uuid::new_v4(), application());
        assert_eq!(profile.status, VerificationStatus::Pending);
        assert_eq!(profile.headline, "Guitar teacher");
        assert_eq!(profile.expertise, vec!["Guitar".to_string()]);
        assert!(!profile.is_publicly_trusted());
    }

    #[test]
    fn test_approve_pending() {
        let admin = Uuid::new_v4();
        let mut profile = InstructorProfile::submit(Uuid::new_v4(), application());
        profile.approve(admin).unwrap();

        assert!(profile.is_publicly_trusted());
        assert_eq!(profile.reviewed_by, Some(admin));
        assert!(profile.approve(admin).is_err());
        assert!(profile.resubmit(application()).is_err());
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut profile = InstructorProfile::submit(Uuid::new_v4(), application());
        assert!(matches!(
            profile.reject(Uuid::new_v4(), "  "),
            Err(DomainError::Validation { .. })
        ));
        assert_eq!(profile.status, VerificationStatus::Pending);
    }

    #[test]
    fn test_rejected_can_resubmit() {
        let mut profile = InstructorProfile::submit(Uuid::new_v4(), application());
        profile.reject(Uuid::new_v4(), "Missing portfolio").unwrap();
        assert_eq!(profile.rejection_reason.as_deref(), Some("Missing portfolio"));

        profile.resubmit(application()).unwrap();
        assert_eq!(profile.status, VerificationStatus::Pending);
        assert!(profile.rejection_reason.is_none());
    }
}
