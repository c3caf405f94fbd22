//! Token entities for JWT-based session authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT issuer
pub const JWT_ISSUER: &str = "gurmania";

/// JWT audience
pub const JWT_AUDIENCE: &str = "gurmania-api";

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Role of the user at issue time
    pub role: UserRole,

    /// Whether the user's email was verified at issue time
    pub email_verified: bool,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `role` - The user's role
    /// * `email_verified` - Whether the user's email is verified
    /// * `lifetime` - How long the token stays valid
    /// * `issuer` - Issuer claim
    /// * `audience` - Audience claim
    pub fn new_access_token(
        user_id: Uuid,
        role: UserRole,
        email_verified: bool,
        lifetime: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            role,
            email_verified,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks if the claims are valid (not expired and after nbf)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Expiry as a timestamp, used for blacklist retention
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Refresh token entity stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// SHA-256 hash of the token value
    pub token_hash: String,

    /// Rotation chain this token belongs to, for reuse detection
    pub token_family: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub is_revoked: bool,
}

impl RefreshToken {
    /// Creates a new refresh token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `token_hash` - The hashed token value
    /// * `token_family` - Family identifier shared by all rotations of a login
    /// * `lifetime` - How long the token stays valid
    pub fn new(user_id: Uuid, token_hash: String, token_family: String, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            token_family,
            created_at: now,
            expires_at: now + lifetime,
            is_revoked: false,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// A token is valid if it hasn't expired and hasn't been revoked
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.is_revoked
    }

    /// Revokes the refresh token
    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_claims(user_id: Uuid) -> Claims {
        Claims::new_access_token(
            user_id,
            UserRole::Student,
            true,
            Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            JWT_ISSUER,
            JWT_AUDIENCE,
        )
    }

    #[test]
    fn test_access_token_claims() {
        let user_id = Uuid::new_v4();
        let claims = access_claims(user_id);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.aud, JWT_AUDIENCE);
        assert_eq!(claims.role, UserRole::Student);
        assert!(claims.email_verified);
        assert!(claims.is_valid());
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = access_claims(Uuid::new_v4());
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
        assert!(!claims.is_valid());
    }

    #[test]
    fn test_claims_not_before() {
        let mut claims = access_claims(Uuid::new_v4());
        claims.nbf = Utc::now().timestamp() + 3600;

        assert!(!claims.is_valid());
    }

    #[test]
    fn test_refresh_token_lifecycle() {
        let mut token = RefreshToken::new(
            Uuid::new_v4(),
            "hash".to_string(),
            "family".to_string(),
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        );
        assert!(token.is_valid());

        token.revoke();
        assert!(!token.is_valid());
    }

    #[test]
    fn test_refresh_token_expiration() {
        let mut token = RefreshToken::new(
            Uuid::new_v4(),
            "hash".to_string(),
            "family".to_string(),
            Duration::days(1),
        );
        token.expires_at = Utc::now() - Duration::days(1);

        assert!(token.is_expired());
        assert!(!token.is_valid());
    }
}
