//! Rate limiting seam for the authentication service

use async_trait::async_trait;
use std::fmt;

/// What a counter limits; each scope has its own limit and window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitScope {
    /// Failed logins for one email address
    LoginEmail,
    /// Failed logins from one client IP
    LoginIp,
    /// Mails of any kind sent to one address
    Mail,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::LoginEmail => "login_email",
            RateLimitScope::LoginIp => "login_ip",
            RateLimitScope::Mail => "mail",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate limiting service trait for login failures and outbound mail
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Whether `identifier` has exhausted its budget in `scope`
    async fn check_rate_limit(&self, scope: RateLimitScope, identifier: &str) -> Result<bool, String>;

    /// Count one event; returns the count within the current window
    async fn increment_counter(&self, scope: RateLimitScope, identifier: &str) -> Result<i64, String>;

    /// Forget all events of `identifier` in `scope`
    async fn reset_counter(&self, scope: RateLimitScope, identifier: &str) -> Result<(), String>;

    /// Seconds until the oldest counted event leaves the window
    async fn get_rate_limit_reset_time(
        &self,
        scope: RateLimitScope,
        identifier: &str,
    ) -> Result<Option<i64>, String>;
}
