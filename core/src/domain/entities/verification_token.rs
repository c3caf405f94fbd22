//! Mailed single-use tokens: email verification, password reset/set links and
//! two-factor login codes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of wrong two-factor code attempts
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of a two-factor code
pub const CODE_LENGTH: usize = 6;

/// Random bytes in a link token
pub const LINK_TOKEN_BYTES: usize = 32;

/// What a verification token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPurpose {
    /// Confirms ownership of an email address
    EmailVerification,
    /// Authorizes a password reset for a forgotten password
    PasswordReset,
    /// Authorizes setting a first password on a password-less account
    PasswordSet,
    /// Second login factor
    TwoFactor,
}

impl TokenPurpose {
    /// Canonical string form, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "EMAIL_VERIFICATION",
            TokenPurpose::PasswordReset => "PASSWORD_RESET",
            TokenPurpose::PasswordSet => "PASSWORD_SET",
            TokenPurpose::TwoFactor => "TWO_FACTOR",
        }
    }

    /// Whether the token is delivered as a link rather than a typed code
    pub fn is_link(&self) -> bool {
        !matches!(self, TokenPurpose::TwoFactor)
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL_VERIFICATION" => Ok(TokenPurpose::EmailVerification),
            "PASSWORD_RESET" => Ok(TokenPurpose::PasswordReset),
            "PASSWORD_SET" => Ok(TokenPurpose::PasswordSet),
            "TWO_FACTOR" => Ok(TokenPurpose::TwoFactor),
            _ => Err(format!("Invalid token purpose: {}", s)),
        }
    }
}

/// A stored verification token; the plaintext only exists in the mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Unique identifier
    pub id: Uuid,

    /// Address the token was mailed to
    pub email: String,

    /// Owning user, set when the token targets an existing account
    /// (email change, password set)
    pub user_id: Option<Uuid>,

    /// SHA-256 hash of the token or code
    pub token_hash: String,

    /// What the token authorizes
    pub purpose: TokenPurpose,

    /// Wrong attempts so far (two-factor codes only)
    pub attempts: u32,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Creates a new verification token
    ///
    /// # Arguments
    ///
    /// * `email` - Destination address (normalized)
    /// * `user_id` - Owning user, if any
    /// * `token_hash` - Hash of the mailed secret
    /// * `purpose` - What the token authorizes
    /// * `lifetime` - How long the token stays valid
    pub fn new(
        email: String,
        user_id: Option<Uuid>,
        token_hash: String,
        purpose: TokenPurpose,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            user_id,
            token_hash,
            purpose,
            attempts: 0,
            created_at: now,
            expires_at: now + lifetime,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether another wrong attempt is still allowed
    pub fn can_attempt(&self) -> bool {
        self.attempts < MAX_ATTEMPTS
    }

    /// Attempts left before the code is discarded
    pub fn remaining_attempts(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Seconds since the token was created
    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(purpose: TokenPurpose, lifetime: Duration) -> VerificationToken {
        VerificationToken::new(
            "ana@example.com".to_string(),
            None,
            "hash".to_string(),
            purpose,
            lifetime,
        )
    }

    #[test]
    fn test_new_token() {
        let token = token(TokenPurpose::TwoFactor, Duration::minutes(5));
        assert_eq!(token.attempts, 0);
        assert!(!token.is_expired());
        assert!(token.can_attempt());
        assert_eq!(token.remaining_attempts(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_expired_token() {
        let mut token = token(TokenPurpose::PasswordReset, Duration::hours(1));
        token.expires_at = Utc::now() - Duration::seconds(1);
        assert!(token.is_expired());
    }

    #[test]
    fn test_attempt_budget() {
        let mut token = token(TokenPurpose::TwoFactor, Duration::minutes(5));
        token.attempts = MAX_ATTEMPTS - 1;
        assert!(token.can_attempt());
        token.attempts = MAX_ATTEMPTS;
        assert!(!token.can_attempt());
        assert_eq!(token.remaining_attempts(), 0);
    }

    #[test]
    fn test_purpose_parsing() {
        for purpose in [
            TokenPurpose::EmailVerification,
            TokenPurpose::PasswordReset,
            TokenPurpose::PasswordSet,
            TokenPurpose::TwoFactor,
        ] {
            assert_eq!(purpose.as_str().parse::<TokenPurpose>().unwrap(), purpose);
        }
        assert!(TokenPurpose::PasswordSet.is_link());
        assert!(!TokenPurpose::TwoFactor.is_link());
    }
}
