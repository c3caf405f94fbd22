//! Redis-based rate limiter for login failures and outbound mail
//!
//! Each scope/identifier pair is a sorted set of event timestamps; counting
//! the members newer than the window start gives a sliding window.
//! Identifiers are hashed before they become part of a key.

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use gm_core::services::auth::{RateLimitScope, RateLimiterTrait};
use gm_shared::RateLimitConfig;

use super::limits::ScopeLimit;
use crate::cache::redis_client::RedisClient;

/// Redis-based implementation of the rate limiter trait
pub struct RedisRateLimiter {
    redis_client: Arc<RedisClient>,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    pub fn new(redis_client: Arc<RedisClient>, config: RateLimitConfig) -> Self {
        Self {
            redis_client,
            config,
        }
    }

    fn key(&self, scope: RateLimitScope, identifier: &str) -> String {
        self.redis_client
            .key(&format!("rate_limit:{}:{}", scope, hash_identifier(identifier)))
    }

    /// Drop events that left the window and count the rest
    async fn current_count(
        &self,
        key: &str,
        limit: &ScopeLimit,
        now: i64,
    ) -> Result<i64, String> {
        let mut conn = self.redis_client.get_connection();
        let window_start = now - limit.window_millis();

        let _: i64 = redis::cmd("ZREMRANGEBYSCORE")
            .arg(key)
            .arg("-inf")
            .arg(window_start)
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("Failed to trim rate limit window: {}", e))?;

        conn.zcount(key, window_start, "+inf")
            .await
            .map_err(|e| format!("Failed to count rate limit: {}", e))
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check_rate_limit(&self, scope: RateLimitScope, identifier: &str) -> Result<bool, String> {
        if !self.config.enabled {
            return Ok(false);
        }
        let limit = ScopeLimit::for_scope(&self.config, scope);
        let key = self.key(scope, identifier);
        let count = self.current_count(&key, &limit, Utc::now().timestamp_millis()).await?;
        Ok(count >= limit.limit as i64)
    }

    async fn increment_counter(&self, scope: RateLimitScope, identifier: &str) -> Result<i64, String> {
        let limit = ScopeLimit::for_scope(&self.config, scope);
        let key = self.key(scope, identifier);
        let now = Utc::now().timestamp_millis();
        let mut conn = self.redis_client.get_connection();

        // Unique member so two events in the same millisecond both count
        let member = format!("{}:{}", now, Uuid::new_v4());
        let _: i64 = conn
            .zadd(&key, member, now)
            .await
            .map_err(|e| format!("Failed to increment counter: {}", e))?;
        let _: bool = conn
            .expire(&key, limit.window_seconds as i64)
            .await
            .map_err(|e| format!("Failed to set expiry: {}", e))?;

        self.current_count(&key, &limit, now).await
    }

    async fn reset_counter(&self, scope: RateLimitScope, identifier: &str) -> Result<(), String> {
        let key = self.key(scope, identifier);
        let mut conn = self.redis_client.get_connection();
        let _: i64 = conn
            .del(&key)
            .await
            .map_err(|e| format!("Failed to reset counter: {}", e))?;
        Ok(())
    }

    async fn get_rate_limit_reset_time(
        &self,
        scope: RateLimitScope,
        identifier: &str,
    ) -> Result<Option<i64>, String> {
        let limit = ScopeLimit::for_scope(&self.config, scope);
        let key = self.key(scope, identifier);
        let now = Utc::now().timestamp_millis();
        let window_start = now - limit.window_millis();
        let mut conn = self.redis_client.get_connection();

        let oldest: Vec<(String, i64)> = conn
            .zrangebyscore_limit_withscores(&key, window_start, "+inf", 0, 1)
            .await
            .map_err(|e| format!("Failed to get oldest entry: {}", e))?;

        Ok(oldest
            .first()
            .map(|(_, timestamp)| ((timestamp + limit.window_millis() - now) / 1000).max(0)))
    }
}

/// SHA-256 of an identifier, so raw emails and IPs never appear in keys
pub(crate) fn hash_identifier(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}
