//! In-memory implementation of VerificationTokenRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use crate::errors::DomainError;

use super::trait_::VerificationTokenRepository;

/// Process-local verification token store
#[derive(Clone, Default)]
pub struct InMemoryVerificationTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, VerificationToken>>>,
}

impl InMemoryVerificationTokenRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryVerificationTokenRepository {
    async fn save(&self, token: VerificationToken) -> Result<VerificationToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, t| !(t.email == token.email && t.purpose == token.purpose));
        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.token_hash == token_hash && t.purpose == purpose)
            .cloned())
    }

    async fn find_latest(
        &self,
        email: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.email == email && t.purpose == purpose)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn increment_attempts(&self, id: Uuid) -> Result<u32, DomainError> {
        let mut tokens = self.tokens.write().await;
        let token = tokens
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Verification token"))?;
        token.attempts += 1;
        Ok(token.attempts)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(&id).is_some())
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired());
        Ok(before - tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(email: &str, hash: &str, purpose: TokenPurpose) -> VerificationToken {
        VerificationToken::new(
            email.to_string(),
            None,
            hash.to_string(),
            purpose,
            Duration::hours(1),
        )
    }

    #[tokio::test]
    async fn test_save_replaces_same_email_and_purpose() {
        let repo = InMemoryVerificationTokenRepository::new();
        repo.save(token("a@example.com", "h1", TokenPurpose::PasswordReset)).await.unwrap();
        repo.save(token("a@example.com", "h2", TokenPurpose::PasswordReset)).await.unwrap();
        repo.save(token("a@example.com", "h3", TokenPurpose::EmailVerification)).await.unwrap();

        assert!(repo.find_by_hash("h1", TokenPurpose::PasswordReset).await.unwrap().is_none());
        assert!(repo.find_by_hash("h2", TokenPurpose::PasswordReset).await.unwrap().is_some());
        assert!(repo.find_by_hash("h3", TokenPurpose::EmailVerification).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_by_hash_checks_purpose() {
        let repo = InMemoryVerificationTokenRepository::new();
        repo.save(token("a@example.com", "h1", TokenPurpose::PasswordSet)).await.unwrap();

        assert!(repo.find_by_hash("h1", TokenPurpose::PasswordReset).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_attempts() {
        let repo = InMemoryVerificationTokenRepository::new();
        let saved = repo.save(token("a@example.com", "h", TokenPurpose::TwoFactor)).await.unwrap();

        assert_eq!(repo.increment_attempts(saved.id).await.unwrap(), 1);
        assert_eq!(repo.increment_attempts(saved.id).await.unwrap(), 2);
        assert!(repo.increment_attempts(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let repo = InMemoryVerificationTokenRepository::new();
        let mut expired = token("a@example.com", "old", TokenPurpose::TwoFactor);
        expired.expires_at = chrono::Utc::now() - Duration::minutes(1);
        repo.save(expired).await.unwrap();
        repo.save(token("b@example.com", "new", TokenPurpose::TwoFactor)).await.unwrap();

        assert_eq!(repo.delete_expired().await.unwrap(), 1);
    }
}
