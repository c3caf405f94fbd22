//! Main authentication service implementation

use std::sync::Arc;

use gm_shared::email;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenPair};
use crate::domain::entities::user::{User, UserRole};
use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use crate::domain::value_objects::{AuthSession, LoginOutcome, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::UserRepository;
use crate::services::mail::{MailComposer, MailMessage, MailServiceTrait};
use crate::services::token::TokenService;
use crate::services::trusted_device::TrustedDeviceService;
use crate::services::two_factor::TwoFactorService;
use crate::services::verification::VerificationTokenService;

use super::config::AuthServiceConfig;
use super::password::PasswordHasher;
use super::rate_limiter::{RateLimitScope, RateLimiterTrait};
use super::types::{LoginRequest, RegisterRequest};

/// Everything the authentication service talks to
pub struct AuthDependencies {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<TokenService>,
    pub verification: Arc<VerificationTokenService>,
    pub two_factor: Arc<TwoFactorService>,
    pub devices: Arc<TrustedDeviceService>,
    pub mailer: Arc<dyn MailServiceTrait>,
    pub composer: MailComposer,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
    pub hasher: PasswordHasher,
}

/// How the second factor was satisfied during a login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecondFactor {
    /// Two-factor is off for this account
    NotRequired,
    /// A trusted-device cookie was accepted
    TrustedDevice,
    /// A mailed code was verified
    Code,
    /// A backup code was redeemed
    BackupCode,
}

impl SecondFactor {
    fn was_presented(self) -> bool {
        matches!(self, SecondFactor::Code | SecondFactor::BackupCode)
    }
}

/// Authentication service for the complete login and account security flow
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    verification: Arc<VerificationTokenService>,
    two_factor: Arc<TwoFactorService>,
    devices: Arc<TrustedDeviceService>,
    mailer: Arc<dyn MailServiceTrait>,
    composer: MailComposer,
    rate_limiter: Arc<dyn RateLimiterTrait>,
    hasher: PasswordHasher,
    config: AuthServiceConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(deps: AuthDependencies, config: AuthServiceConfig) -> Self {
        Self {
            users: deps.users,
            tokens: deps.tokens,
            verification: deps.verification,
            two_factor: deps.two_factor,
            devices: deps.devices,
            mailer: deps.mailer,
            composer: deps.composer,
            rate_limiter: deps.rate_limiter,
            hasher: deps.hasher,
            config,
        }
    }

    /// Register a new student or instructor account
    ///
    /// The account starts unverified and a verification link is mailed. A
    /// failed mail does not undo the registration; logging in re-sends it.
    ///
    /// # Errors
    ///
    /// * `RegistrationDisabled` - Registration is switched off
    /// * `InsufficientPermissions` - ADMIN was requested
    /// * `UserAlreadyExists` - The email is taken
    /// * Validation errors for name, email and password policy
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<UserProfile> {
        if !self.config.allow_registration {
            return Err(AuthError::RegistrationDisabled.into());
        }
        if request.role == UserRole::Admin {
            return Err(AuthError::InsufficientPermissions.into());
        }
        if request.name.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            }
            .into());
        }

        let email_address = self.validated_email(&request.email)?;
        if self.users.exists_by_email(&email_address).await? {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.hasher.hash(&request.password).await?;
        let user = self
            .users
            .create(User::new(
                request.name,
                &email_address,
                Some(password_hash),
                request.role,
            ))
            .await?;

        info!(
            event = "user_registered",
            user_id = %user.id,
            role = %user.role,
            email = %email::mask(&user.email),
            "New account registered"
        );

        if let Err(e) = self.send_verification_email(&user.email, None).await {
            warn!(
                event = "verification_mail_failed",
                user_id = %user.id,
                error = %e,
                "Could not send verification email after registration"
            );
        }

        Ok(UserProfile::from(&user))
    }

    /// Log in with email and password, handling the second factor
    ///
    /// Failures that are not about the caller's credentials (blocked account,
    /// unverified email, second factor pending) are not counted against the
    /// rate limit.
    pub async fn login(&self, request: LoginRequest) -> DomainResult<LoginOutcome> {
        let email_address = email::normalize(&request.email);

        self.ensure_not_limited(RateLimitScope::LoginEmail, &email_address)
            .await?;
        if let Some(ip) = request.client_ip.as_deref() {
            self.ensure_not_limited(RateLimitScope::LoginIp, ip).await?;
        }

        let user = match self.check_credentials(&email_address, &request.password).await? {
            Some(user) => user,
            None => {
                self.record_login_failure(&email_address, request.client_ip.as_deref())
                    .await;
                warn!(
                    event = "login_failed",
                    email = %email::mask(&email_address),
                    reason = "invalid_credentials",
                    "Login rejected"
                );
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if user.is_blocked {
            warn!(event = "login_blocked", user_id = %user.id, "Blocked user attempted to log in");
            return Err(AuthError::UserBlocked.into());
        }

        if !user.is_email_verified() {
            self.send_verification_email(&user.email, None).await?;
            info!(
                event = "login_email_unverified",
                user_id = %user.id,
                "Login held until email is verified"
            );
            return Ok(LoginOutcome::EmailVerificationRequired);
        }

        let second_factor = if user.is_two_factor_enabled {
            match self.check_second_factor(&user, &request).await? {
                Some(factor) => factor,
                None => {
                    let issued = self
                        .verification
                        .issue_two_factor_code(&user.email, Some(user.id))
                        .await?;
                    self.send_mail(self.composer.two_factor_email(&user.email, &issued.code))
                        .await?;
                    return Ok(LoginOutcome::TwoFactorRequired {
                        email_hint: email::mask(&user.email),
                    });
                }
            }
        } else {
            SecondFactor::NotRequired
        };

        let session = self
            .complete_login(user, second_factor, &request)
            .await?;
        Ok(LoginOutcome::Authenticated(Box::new(session)))
    }

    /// Returns the user when the password matches
    async fn check_credentials(&self, email_address: &str, password: &str) -> DomainResult<Option<User>> {
        let Some(user) = self.users.find_by_email(email_address).await? else {
            return Ok(None);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(None);
        };
        if self.hasher.verify(password, hash).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Resolve the second factor; `None` means a code must be mailed
    async fn check_second_factor(
        &self,
        user: &User,
        request: &LoginRequest,
    ) -> DomainResult<Option<SecondFactor>> {
        if let Some(cookie) = request.device_cookie.as_deref() {
            if self.devices.is_trusted(user.id, cookie).await? {
                return Ok(Some(SecondFactor::TrustedDevice));
            }
        }

        if let Some(backup_code) = non_empty(request.backup_code.as_deref()) {
            if self.two_factor.consume_backup_code(user.id, backup_code).await? {
                return Ok(Some(SecondFactor::BackupCode));
            }
            self.record_login_failure(&user.email, request.client_ip.as_deref())
                .await;
            warn!(event = "backup_code_invalid", user_id = %user.id, "Invalid backup code");
            return Err(AuthError::InvalidBackupCode.into());
        }

        if let Some(code) = non_empty(request.code.as_deref()) {
            self.verification
                .verify_two_factor_code(&user.email, code)
                .await?;
            return Ok(Some(SecondFactor::Code));
        }

        Ok(None)
    }

    async fn complete_login(
        &self,
        mut user: User,
        second_factor: SecondFactor,
        request: &LoginRequest,
    ) -> DomainResult<AuthSession> {
        let _ = self
            .rate_limiter
            .reset_counter(RateLimitScope::LoginEmail, &user.email)
            .await;

        user.update_last_login();
        let user = self.users.update(user).await?;
        let tokens = self.tokens.generate_tokens(&user).await?;

        let trusted_device = if request.trust_device && second_factor.was_presented() {
            Some(
                self.devices
                    .trust(user.id, request.device_label.clone(), request.client_ip.clone())
                    .await?,
            )
        } else {
            None
        };

        info!(
            event = "login_succeeded",
            user_id = %user.id,
            second_factor = ?second_factor,
            device_trusted = trusted_device.is_some(),
            "User logged in"
        );

        Ok(AuthSession {
            tokens,
            user: UserProfile::from(&user),
            trusted_device,
            used_backup_code: second_factor == SecondFactor::BackupCode,
        })
    }

    /// End a session
    ///
    /// The access token stays blacklisted until it would have expired. With
    /// a refresh token only that session ends, otherwise all of them do.
    pub async fn logout(&self, claims: &Claims, refresh_token: Option<&str>) -> DomainResult<()> {
        self.tokens.blacklist_access_token(claims).await?;

        match non_empty(refresh_token) {
            Some(token) => {
                self.tokens.revoke_refresh_token(token).await?;
            }
            None => {
                let user_id = claims
                    .user_id()
                    .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;
                self.tokens.revoke_tokens(user_id).await?;
            }
        }

        info!(event = "logout", user_id = %claims.sub, "User logged out");
        Ok(())
    }

    /// Rotate a refresh token for a fresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let user_id = self.tokens.verify_refresh_token(refresh_token).await?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        if user.is_blocked {
            return Err(AuthError::UserBlocked.into());
        }

        self.tokens.refresh_tokens(refresh_token, &user).await
    }

    /// Confirm an email address from a mailed link
    ///
    /// Tokens issued by [`Self::request_email_change`] carry the user id and
    /// move the account to the new address.
    pub async fn verify_email(&self, token: &str) -> DomainResult<UserProfile> {
        let record = self
            .verification
            .consume_link_token(token, TokenPurpose::EmailVerification)
            .await?;

        let mut user = self.user_for_token(&record).await?;
        if user.email != record.email {
            if self.users.exists_by_email(&record.email).await? {
                return Err(AuthError::UserAlreadyExists.into());
            }
            info!(
                event = "email_changed",
                user_id = %user.id,
                email = %email::mask(&record.email),
                "Email address changed"
            );
            user.change_email(&record.email);
        }
        user.mark_email_verified();
        let user = self.users.update(user).await?;

        info!(event = "email_verified", user_id = %user.id, "Email address verified");
        Ok(UserProfile::from(&user))
    }

    /// Mail a password reset link
    ///
    /// Unknown addresses get the same answer as known ones.
    pub async fn request_password_reset(&self, email_address: &str) -> DomainResult<()> {
        let email_address = self.validated_email(email_address)?;
        self.ensure_not_limited(RateLimitScope::Mail, &email_address)
            .await?;

        let Some(user) = self.users.find_by_email(&email_address).await? else {
            let _ = self
                .rate_limiter
                .increment_counter(RateLimitScope::Mail, &email_address)
                .await;
            debug!(
                event = "password_reset_unknown_email",
                email = %email::mask(&email_address),
                "Password reset requested for unknown email"
            );
            return Ok(());
        };

        let token = self
            .verification
            .issue_link_token(&user.email, TokenPurpose::PasswordReset, Some(user.id))
            .await?;
        self.send_mail(self.composer.password_reset_email(&user.email, &token))
            .await?;

        info!(event = "password_reset_requested", user_id = %user.id, "Password reset link sent");
        Ok(())
    }

    /// Mail a set-password link to a signed-in user without a password
    pub async fn request_password_set(&self, user_id: Uuid) -> DomainResult<()> {
        let user = self.load_user(user_id).await?;
        if user.has_password() {
            return Err(DomainError::BusinessRule {
                message: "Account already has a password".to_string(),
            });
        }

        let token = self
            .verification
            .issue_link_token(&user.email, TokenPurpose::PasswordSet, Some(user.id))
            .await?;
        self.send_mail(self.composer.password_set_email(&user.email, &token))
            .await?;

        info!(event = "password_set_requested", user_id = %user.id, "Password set link sent");
        Ok(())
    }

    /// Store a new password from a reset or set link
    ///
    /// The password policy is checked before the token is consumed so a
    /// rejected password does not burn the link. Completing the flow proves
    /// control of the mailbox, so the email counts as verified. All sessions
    /// and trusted devices are revoked.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> DomainResult<()> {
        let password_hash = self.hasher.hash(new_password).await?;

        let record = match self
            .verification
            .consume_link_token(token, TokenPurpose::PasswordReset)
            .await
        {
            Err(DomainError::Token(TokenError::InvalidToken)) => {
                self.verification
                    .consume_link_token(token, TokenPurpose::PasswordSet)
                    .await?
            }
            other => other?,
        };

        let mut user = self.user_for_token(&record).await?;
        user.set_password_hash(password_hash);
        user.mark_email_verified();
        let user = self.users.update(user).await?;

        self.tokens.revoke_tokens(user.id).await?;
        self.devices.revoke_all(user.id).await?;

        info!(
            event = "password_reset",
            user_id = %user.id,
            purpose = %record.purpose,
            "Password updated from mailed link"
        );
        Ok(())
    }

    /// Change the password of a signed-in user
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.load_user(user_id).await?;
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(DomainError::BusinessRule {
                message: "Account has no password, request a set-password link".to_string(),
            });
        };

        if !self.hasher.verify(current_password, hash).await? {
            warn!(event = "password_change_rejected", user_id = %user_id, "Wrong current password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let new_hash = self.hasher.hash(new_password).await?;
        user.set_password_hash(new_hash);
        self.users.update(user).await?;

        info!(event = "password_changed", user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Mail a confirmation link to a new address; the change applies once
    /// the link is opened
    pub async fn request_email_change(&self, user_id: Uuid, new_email: &str) -> DomainResult<()> {
        let user = self.load_user(user_id).await?;
        let new_email = self.validated_email(new_email)?;

        if new_email == user.email {
            return Err(DomainError::BusinessRule {
                message: "New email matches the current one".to_string(),
            });
        }
        if self.users.exists_by_email(&new_email).await? {
            return Err(AuthError::UserAlreadyExists.into());
        }

        self.send_verification_email(&new_email, Some(user.id)).await?;

        info!(
            event = "email_change_requested",
            user_id = %user.id,
            email = %email::mask(&new_email),
            "Email change confirmation sent"
        );
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> DomainResult<UserProfile> {
        self.load_user(user_id).await.map(|user| UserProfile::from(&user))
    }

    async fn load_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    async fn user_for_token(&self, record: &VerificationToken) -> DomainResult<User> {
        let user = match record.user_id {
            Some(user_id) => self.users.find_by_id(user_id).await?,
            None => self.users.find_by_email(&record.email).await?,
        };
        user.ok_or_else(|| AuthError::UserNotFound.into())
    }

    fn validated_email(&self, raw: &str) -> DomainResult<String> {
        let normalized = email::normalize(raw);
        if email::is_valid(&normalized) {
            Ok(normalized)
        } else {
            Err(ValidationError::InvalidEmail.into())
        }
    }

    async fn send_verification_email(&self, to: &str, user_id: Option<Uuid>) -> DomainResult<()> {
        self.ensure_not_limited(RateLimitScope::Mail, to).await?;
        let token = self
            .verification
            .issue_link_token(to, TokenPurpose::EmailVerification, user_id)
            .await?;
        self.send_mail(self.composer.verification_email(to, &token))
            .await
    }

    /// Hand a message to the provider and count it against the mail limit
    async fn send_mail(&self, message: MailMessage) -> DomainResult<()> {
        self.ensure_not_limited(RateLimitScope::Mail, &message.to)
            .await?;

        match self.mailer.send_mail(&message).await {
            Ok(message_id) => {
                let _ = self
                    .rate_limiter
                    .increment_counter(RateLimitScope::Mail, &message.to)
                    .await;
                debug!(
                    event = "mail_sent",
                    to = %email::mask(&message.to),
                    message_id = %message_id,
                    "Mail handed to provider"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    event = "mail_failed",
                    to = %email::mask(&message.to),
                    error = %e,
                    "Mail provider rejected message"
                );
                Err(AuthError::MailServiceFailure.into())
            }
        }
    }

    async fn ensure_not_limited(&self, scope: RateLimitScope, identifier: &str) -> DomainResult<()> {
        let exceeded = self
            .rate_limiter
            .check_rate_limit(scope, identifier)
            .await
            .map_err(|e| DomainError::internal("rate limit check", e))?;

        if !exceeded {
            return Ok(());
        }

        let reset_time = self
            .rate_limiter
            .get_rate_limit_reset_time(scope, identifier)
            .await
            .unwrap_or(Some(3600))
            .unwrap_or(3600);
        let minutes = (reset_time / 60).max(1) as u32;

        warn!(
            event = "rate_limit_exceeded",
            scope = %scope,
            retry_after_minutes = minutes,
            "Rate limit exceeded"
        );
        Err(AuthError::RateLimitExceeded { minutes }.into())
    }

    async fn record_login_failure(&self, email_address: &str, client_ip: Option<&str>) {
        let _ = self
            .rate_limiter
            .increment_counter(RateLimitScope::LoginEmail, email_address)
            .await;
        if let Some(ip) = client_ip {
            let _ = self
                .rate_limiter
                .increment_counter(RateLimitScope::LoginIp, ip)
                .await;
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
