//! In-memory implementation of TokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::trait_::TokenRepository;

/// Process-local refresh token store and blacklist
#[derive(Clone, Default)]
pub struct InMemoryTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
    blacklist: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl InMemoryTokenRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_valid())
            .cloned()
            .collect())
    }

    async fn revoke_token(&self, token_hash: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token_hash) {
            Some(token) if !token.is_revoked => {
                token.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;
        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.is_revoked {
                token.revoke();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn revoke_token_family(&self, token_family: &str) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;
        for token in tokens.values_mut() {
            if token.token_family == token_family && !token.is_revoked {
                token.revoke();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired());
        Ok(before - tokens.len())
    }

    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut blacklist = self.blacklist.write().await;
        blacklist.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, DomainError> {
        let blacklist = self.blacklist.read().await;
        Ok(blacklist.contains_key(jti))
    }

    async fn cleanup_blacklist(&self) -> Result<usize, DomainError> {
        let mut blacklist = self.blacklist.write().await;
        let now = Utc::now();
        let before = blacklist.len();
        blacklist.retain(|_, expires_at| *expires_at > now);
        Ok(before - blacklist.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(user_id: Uuid, hash: &str, family: &str) -> RefreshToken {
        RefreshToken::new(user_id, hash.to_string(), family.to_string(), Duration::days(7))
    }

    #[tokio::test]
    async fn test_revoke_family_only_touches_family() {
        let repo = InMemoryTokenRepository::new();
        let user_id = Uuid::new_v4();
        repo.save_refresh_token(token(user_id, "a", "f1")).await.unwrap();
        repo.save_refresh_token(token(user_id, "b", "f1")).await.unwrap();
        repo.save_refresh_token(token(user_id, "c", "f2")).await.unwrap();

        assert_eq!(repo.revoke_token_family("f1").await.unwrap(), 2);
        let active = repo.find_by_user_id(user_id).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].token_hash, "c");
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let repo = InMemoryTokenRepository::new();
        let mut expired = token(Uuid::new_v4(), "old", "f");
        expired.expires_at = Utc::now() - Duration::hours(1);
        repo.save_refresh_token(expired).await.unwrap();
        repo.save_refresh_token(token(Uuid::new_v4(), "new", "g")).await.unwrap();

        assert_eq!(repo.delete_expired_tokens().await.unwrap(), 1);
        assert!(repo.find_refresh_token("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blacklist_cleanup() {
        let repo = InMemoryTokenRepository::new();
        repo.blacklist_token("live", Utc::now() + Duration::minutes(5)).await.unwrap();
        repo.blacklist_token("dead", Utc::now() - Duration::minutes(5)).await.unwrap();

        assert_eq!(repo.cleanup_blacklist().await.unwrap(), 1);
        assert!(repo.is_token_blacklisted("live").await.unwrap());
        assert!(!repo.is_token_blacklisted("dead").await.unwrap());
    }
}
