//! Main verification service implementation

use chrono::{Duration, Utc};
use gm_shared::email;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken, CODE_LENGTH, LINK_TOKEN_BYTES};
use crate::domain::secrets;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::VerificationTokenRepository;

use super::config::VerificationServiceConfig;
use super::types::IssuedCode;

/// Issues and consumes single-use mailed tokens and two-factor codes
///
/// Only SHA-256 hashes reach the repository. Issuing a token for an
/// `(email, purpose)` pair replaces whatever was issued before.
pub struct VerificationTokenService {
    repository: Arc<dyn VerificationTokenRepository>,
    config: VerificationServiceConfig,
}

impl VerificationTokenService {
    pub fn new(
        repository: Arc<dyn VerificationTokenRepository>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self { repository, config }
    }

    /// Issue a link token (email verification, password reset or set)
    ///
    /// # Returns
    ///
    /// The plaintext token to embed in the mailed link
    pub async fn issue_link_token(
        &self,
        email: &str,
        purpose: TokenPurpose,
        user_id: Option<Uuid>,
    ) -> DomainResult<String> {
        if !purpose.is_link() {
            return Err(DomainError::internal(
                "issue_link_token",
                format!("{} is not a link token", purpose),
            ));
        }

        let token = secrets::random_url_token(LINK_TOKEN_BYTES);
        let record = VerificationToken::new(
            email.to_string(),
            user_id,
            secrets::sha256_hex(&token),
            purpose,
            self.config.lifetime(purpose),
        );
        self.repository.save(record).await?;

        tracing::info!(
            email = %email::mask(email),
            purpose = %purpose,
            event = "verification_token_issued",
            "Issued verification token"
        );

        Ok(token)
    }

    /// Consume a link token
    ///
    /// The token is deleted whether it was valid or expired, so a link works
    /// at most once.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidToken` - Unknown token or wrong purpose
    /// * `TokenError::TokenExpired` - Token existed but is past its lifetime
    pub async fn consume_link_token(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> DomainResult<VerificationToken> {
        let record = self
            .repository
            .find_by_hash(&secrets::sha256_hex(token.trim()), purpose)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;

        // A concurrent consumer already took it
        if !self.repository.delete(record.id).await? {
            return Err(DomainError::Token(TokenError::InvalidToken));
        }

        if record.is_expired() {
            tracing::info!(
                email = %email::mask(&record.email),
                purpose = %purpose,
                event = "verification_token_expired",
                "Expired verification token presented"
            );
            return Err(DomainError::Token(TokenError::TokenExpired));
        }

        Ok(record)
    }

    /// Issue a two-factor code for an address
    ///
    /// # Errors
    ///
    /// * `AuthError::ResendCooldown` - A code was issued less than the cooldown ago
    pub async fn issue_two_factor_code(
        &self,
        email_address: &str,
        user_id: Option<Uuid>,
    ) -> DomainResult<IssuedCode> {
        if let Some(previous) = self
            .repository
            .find_latest(email_address, TokenPurpose::TwoFactor)
            .await?
        {
            let remaining = self.config.resend_cooldown_seconds - previous.age_seconds();
            if remaining > 0 {
                tracing::warn!(
                    email = %email::mask(email_address),
                    cooldown_remaining = remaining,
                    event = "two_factor_resend_cooldown",
                    "Two-factor code requested during cooldown"
                );
                return Err(AuthError::ResendCooldown { seconds: remaining }.into());
            }
        }

        let code = secrets::random_numeric_code(CODE_LENGTH as u32);
        let record = VerificationToken::new(
            email_address.to_string(),
            user_id,
            secrets::sha256_hex(&code),
            TokenPurpose::TwoFactor,
            self.config.lifetime(TokenPurpose::TwoFactor),
        );
        let saved = self.repository.save(record).await?;

        tracing::info!(
            email = %email::mask(email_address),
            event = "otp_generated",
            token_id = %saved.id,
            "Generated new two-factor code"
        );

        Ok(IssuedCode {
            code,
            expires_at: saved.expires_at,
            next_resend_at: Utc::now() + Duration::seconds(self.config.resend_cooldown_seconds),
        })
    }

    /// Verify a two-factor code
    ///
    /// A correct code is deleted. A wrong code counts an attempt; the attempt
    /// that reaches the limit deletes the code.
    pub async fn verify_two_factor_code(&self, email_address: &str, code: &str) -> DomainResult<()> {
        let record = self
            .repository
            .find_latest(email_address, TokenPurpose::TwoFactor)
            .await?
            .ok_or(AuthError::InvalidTwoFactorCode)?;

        if record.is_expired() {
            self.repository.delete(record.id).await?;
            return Err(AuthError::TwoFactorCodeExpired.into());
        }

        let candidate = secrets::sha256_hex(code.trim());
        if secrets::hashes_match(&record.token_hash, &candidate) {
            if !self.repository.delete(record.id).await? {
                return Err(AuthError::InvalidTwoFactorCode.into());
            }
            tracing::info!(
                email = %email::mask(email_address),
                event = "otp_verified",
                "Two-factor code verified"
            );
            return Ok(());
        }

        let attempts = self.repository.increment_attempts(record.id).await?;
        if attempts >= self.config.max_attempts {
            self.repository.delete(record.id).await?;
            tracing::warn!(
                email = %email::mask(email_address),
                attempts,
                event = "otp_max_attempts",
                "Two-factor code discarded after too many attempts"
            );
            return Err(AuthError::MaxAttemptsExceeded.into());
        }

        tracing::warn!(
            email = %email::mask(email_address),
            attempts,
            remaining = self.config.max_attempts - attempts,
            event = "otp_invalid",
            "Wrong two-factor code"
        );
        Err(AuthError::InvalidTwoFactorCode.into())
    }
}
