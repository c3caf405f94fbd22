//! Main token service implementation

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::domain::secrets;
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Length of the opaque refresh token handed to clients
const REFRESH_TOKEN_LENGTH: usize = 32;

/// Service for managing JWT access tokens and refresh tokens
pub struct TokenService {
    repository: Arc<dyn TokenRepository>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token repository for persistence
    /// * `config` - Token service configuration
    pub fn new(repository: Arc<dyn TokenRepository>, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.config.access_token_expiry_seconds
    }

    /// Generates a new token pair for a user, starting a new token family
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated token pair
    /// * `Err(DomainError)` - Signing or storage failed
    pub async fn generate_tokens(&self, user: &User) -> Result<TokenPair, DomainError> {
        let token_family = Uuid::new_v4().to_string();

        let access_token = self.generate_access_token(user)?;
        let refresh_token = self.generate_refresh_token(user.id, token_family).await?;

        Ok(self.pair(access_token, refresh_token))
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry_seconds,
            self.config.refresh_token_expiry_seconds,
        )
    }

    fn generate_access_token(&self, user: &User) -> Result<String, DomainError> {
        let claims = Claims::new_access_token(
            user.id,
            user.role,
            user.is_email_verified(),
            Duration::seconds(self.config.access_token_expiry_seconds),
            &self.config.issuer,
            &self.config.audience,
        );
        self.encode_jwt(&claims)
    }

    /// Generates a refresh token and stores its hash
    async fn generate_refresh_token(
        &self,
        user_id: Uuid,
        token_family: String,
    ) -> Result<String, DomainError> {
        let token_string = secrets::random_alphanumeric(REFRESH_TOKEN_LENGTH);
        let refresh_token = RefreshToken::new(
            user_id,
            secrets::sha256_hex(&token_string),
            token_family,
            Duration::seconds(self.config.refresh_token_expiry_seconds),
        );

        self.repository
            .save_refresh_token(refresh_token)
            .await
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(token_string)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    fn decode_jwt(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                ErrorKind::ImmatureSignature => DomainError::Token(TokenError::TokenNotYetValid),
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError)` - Token is invalid, expired, malformed or revoked
    pub async fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode_jwt(token)?;

        if self
            .repository
            .is_token_blacklisted(&claims.jti)
            .await
            .map_err(|e| DomainError::internal("Blacklist lookup failed", e))?
        {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        Ok(claims)
    }

    /// Refreshes tokens using a refresh token (with rotation)
    ///
    /// The presented token is revoked and a new one is issued in the same
    /// family. Presenting an already revoked token revokes the whole family.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The refresh token
    /// * `user` - Current state of the token owner, used for the new claims
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
        user: &User,
    ) -> Result<TokenPair, DomainError> {
        let token_hash = secrets::sha256_hex(refresh_token);
        let old_token = self.find_refresh_token(&token_hash).await?;

        if old_token.user_id != user.id {
            return Err(DomainError::Token(TokenError::InvalidRefreshToken));
        }

        // Only the caller that flips the token to revoked may rotate it
        if !self.repository.revoke_token(&token_hash).await? {
            return Err(self.reject_reused_token(&old_token).await?);
        }

        let access_token = self.generate_access_token(user)?;
        let new_refresh_token = self
            .generate_refresh_token(old_token.user_id, old_token.token_family.clone())
            .await?;

        Ok(self.pair(access_token, new_refresh_token))
    }

    /// Resolves a refresh token to its owner without rotating it
    ///
    /// # Returns
    ///
    /// * `Ok(Uuid)` - The user ID if token is valid
    /// * `Err(DomainError)` - Token is unknown, expired, or revoked
    pub async fn verify_refresh_token(&self, refresh_token: &str) -> Result<Uuid, DomainError> {
        let token_hash = secrets::sha256_hex(refresh_token);
        self.find_refresh_token(&token_hash)
            .await
            .map(|token| token.user_id)
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<RefreshToken, DomainError> {
        let token = self
            .repository
            .find_refresh_token(token_hash)
            .await
            .map_err(|_| DomainError::Token(TokenError::InvalidRefreshToken))?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        if token.is_revoked {
            return Err(self.reject_reused_token(&token).await?);
        }

        if token.is_expired() {
            return Err(DomainError::Token(TokenError::RefreshTokenExpired));
        }

        Ok(token)
    }

    /// Revokes the family of a token that was presented after its revocation
    /// and returns the error to hand back to the caller
    async fn reject_reused_token(&self, token: &RefreshToken) -> Result<DomainError, DomainError> {
        let revoked = self
            .repository
            .revoke_token_family(&token.token_family)
            .await?;
        warn!(
            event = "refresh_token_reuse",
            user_id = %token.user_id,
            revoked_tokens = revoked,
            "Revoked refresh token presented, token family revoked"
        );
        Ok(DomainError::Token(TokenError::TokenRevoked))
    }

    /// Revokes all refresh tokens for a user
    pub async fn revoke_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let count = self.repository.revoke_all_user_tokens(user_id).await?;
        info!(event = "refresh_tokens_revoked", user_id = %user_id, count, "Revoked all refresh tokens");
        Ok(count)
    }

    /// Revokes a specific refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - True if token was revoked, false if unknown or already revoked
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<bool, DomainError> {
        let token_hash = secrets::sha256_hex(token);
        self.repository.revoke_token(&token_hash).await
    }

    /// Blacklists an access token by its JWT ID until it expires
    pub async fn blacklist_access_token(&self, claims: &Claims) -> Result<(), DomainError> {
        self.repository
            .blacklist_token(&claims.jti, claims.expires_at())
            .await
    }

    /// Removes expired refresh tokens from storage
    pub async fn cleanup_expired_tokens(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired_tokens().await
    }
}
