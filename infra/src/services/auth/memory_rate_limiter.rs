//! Process-local sliding window rate limiter
//!
//! Used with the in-memory storage backend; counters are lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

use gm_core::services::auth::{RateLimitScope, RateLimiterTrait};
use gm_shared::RateLimitConfig;

use super::limits::ScopeLimit;

type Events = HashMap<(RateLimitScope, String), VecDeque<DateTime<Utc>>>;

#[derive(Clone)]
pub struct InMemoryRateLimiter {
    events: Arc<Mutex<Events>>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            events: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    fn window(&self, scope: RateLimitScope) -> (ScopeLimit, Duration) {
        let limit = ScopeLimit::for_scope(&self.config, scope);
        (limit, Duration::seconds(limit.window_seconds as i64))
    }

    fn entry_key(scope: RateLimitScope, identifier: &str) -> (RateLimitScope, String) {
        (scope, identifier.trim().to_lowercase())
    }

    /// Drop events older than the window start
    fn trim(events: &mut VecDeque<DateTime<Utc>>, window_start: DateTime<Utc>) {
        while events.front().map_or(false, |t| *t <= window_start) {
            events.pop_front();
        }
    }

    /// Trim one key's events, removing the key once nothing is left in its window
    fn trim_key(events: &mut Events, key: &(RateLimitScope, String), window_start: DateTime<Utc>) -> usize {
        let remaining = match events.get_mut(key) {
            Some(entry) => {
                Self::trim(entry, window_start);
                entry.len()
            }
            None => return 0,
        };
        if remaining == 0 {
            events.remove(key);
        }
        remaining
    }

    /// Remove keys whose newest event has left the window
    fn sweep(&self, events: &mut Events, now: DateTime<Utc>) {
        events.retain(|(scope, _), entry| {
            let (_, window) = self.window(*scope);
            entry.back().map_or(false, |newest| *newest > now - window)
        });
    }

    /// Number of identifiers currently tracked
    #[cfg(test)]
    pub(crate) async fn tracked_keys(&self) -> usize {
        self.events.lock().await.len()
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check_rate_limit(&self, scope: RateLimitScope, identifier: &str) -> Result<bool, String> {
        if !self.config.enabled {
            return Ok(false);
        }
        let (limit, window) = self.window(scope);
        let mut events = self.events.lock().await;
        let count = Self::trim_key(&mut events, &Self::entry_key(scope, identifier), Utc::now() - window);
        Ok(count >= limit.limit as usize)
    }

    async fn increment_counter(&self, scope: RateLimitScope, identifier: &str) -> Result<i64, String> {
        let (_, window) = self.window(scope);
        let now = Utc::now();
        let mut events = self.events.lock().await;
        self.sweep(&mut events, now);
        let entry = events.entry(Self::entry_key(scope, identifier)).or_default();
        Self::trim(entry, now - window);
        entry.push_back(now);
        Ok(entry.len() as i64)
    }

    async fn reset_counter(&self, scope: RateLimitScope, identifier: &str) -> Result<(), String> {
        let mut events = self.events.lock().await;
        events.remove(&Self::entry_key(scope, identifier));
        Ok(())
    }

    async fn get_rate_limit_reset_time(
        &self,
        scope: RateLimitScope,
        identifier: &str,
    ) -> Result<Option<i64>, String> {
        let (_, window) = self.window(scope);
        let now = Utc::now();
        let mut events = self.events.lock().await;
        let key = Self::entry_key(scope, identifier);
        Self::trim_key(&mut events, &key, now - window);
        Ok(events
            .get(&key)
            .and_then(|entry| entry.front())
            .map(|oldest| (*oldest + window - now).num_seconds().max(0)))
    }
}
