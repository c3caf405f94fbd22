//! User entity representing a registered account on the Gurmania marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Learner enrolling in courses and workshops
    Student,
    /// Course and workshop author, subject to verification
    Instructor,
    /// Platform moderator
    Admin,
}

impl UserRole {
    /// Canonical string form, as stored in the database and JWT claims
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Instructor => "INSTRUCTOR",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Ok(UserRole::Student),
            "INSTRUCTOR" => Ok(UserRole::Instructor),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Normalized (trimmed, lowercase) email address
    pub email: String,

    /// bcrypt hash; `None` until the user sets a password
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Role of the user
    pub role: UserRole,

    /// When the email address was confirmed
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Whether logins require a second factor
    pub is_two_factor_enabled: bool,

    /// Whether the user account is blocked
    pub is_blocked: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User instance
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `email` - Email address, normalized before storage
    /// * `password_hash` - bcrypt hash of the password, if any
    /// * `role` - Role chosen at registration
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: Option<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            email: gm_shared::email::normalize(email),
            password_hash,
            role,
            email_verified_at: None,
            is_two_factor_enabled: false,
            is_blocked: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Whether the user can log in with a password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Whether the email address has been confirmed
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Marks the email address as confirmed
    pub fn mark_email_verified(&mut self) {
        if self.email_verified_at.is_none() {
            self.email_verified_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
    }

    /// Replaces the email address; the new address starts unverified
    pub fn change_email(&mut self, email: &str) {
        self.email = gm_shared::email::normalize(email);
        self.email_verified_at = None;
        self.updated_at = Utc::now();
    }

    /// Stores a new password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = Some(password_hash);
        self.updated_at = Utc::now();
    }

    /// Turns on two-factor authentication
    pub fn enable_two_factor(&mut self) {
        self.is_two_factor_enabled = true;
        self.updated_at = Utc::now();
    }

    /// Turns off two-factor authentication
    pub fn disable_two_factor(&mut self) {
        self.is_two_factor_enabled = false;
        self.updated_at = Utc::now();
    }

    /// Blocks the user account
    pub fn block(&mut self) {
        self.is_blocked = true;
        self.updated_at = Utc::now();
    }

    /// Unblocks the user account
    pub fn unblock(&mut self) {
        self.is_blocked = false;
        self.updated_at = Utc::now();
    }

    /// Updates the last login timestamp
    pub fn update_last_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Changes the role of the user
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_creation() {
        let user = User::new(" Ana ", "  Ana@Example.COM ", None, UserRole::Student);

        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, UserRole::Student);
        assert!(!user.has_password());
        assert!(!user.is_email_verified());
        assert!(!user.is_two_factor_enabled);
        assert!(!user.is_blocked);
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn test_change_email_clears_verification() {
        let mut user = User::new("Ana", "ana@example.com", None, UserRole::Student);
        user.mark_email_verified();
        assert!(user.is_email_verified());

        user.change_email("New@Example.com");
        assert_eq!(user.email, "new@example.com");
        assert!(!user.is_email_verified());
    }

    #[test]
    fn test_mark_verified_keeps_first_timestamp() {
        let mut user = User::new("Ana", "ana@example.com", None, UserRole::Student);
        user.mark_email_verified();
        let first = user.email_verified_at;
        user.mark_email_verified();
        assert_eq!(user.email_verified_at, first);
    }

    #[test]
    fn test_block_and_unblock() {
        let mut user = User::new("Ana", "ana@example.com", None, UserRole::Instructor);
        user.block();
        assert!(user.is_blocked);
        user.unblock();
        assert!(!user.is_blocked);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Student, UserRole::Instructor, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("teacher".parse::<UserRole>().is_err());
        assert_eq!(
            serde_json::to_string(&UserRole::Instructor).unwrap(),
            "\"INSTRUCTOR\""
        );
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "Ana",
            "ana@example.com",
            Some("$2b$12$hash".to_string()),
            UserRole::Student,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
