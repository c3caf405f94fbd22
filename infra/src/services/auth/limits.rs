use gm_core::services::auth::RateLimitScope;
use gm_shared::RateLimitConfig;

/// Budget for one rate limit scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeLimit {
    pub limit: u32,
    pub window_seconds: u64,
}

impl ScopeLimit {
    pub fn for_scope(config: &RateLimitConfig, scope: RateLimitScope) -> Self {
        match scope {
            RateLimitScope::LoginEmail => Self {
                limit: config.auth.login_attempts_per_email,
                window_seconds: config.auth.window_seconds,
            },
            RateLimitScope::LoginIp => Self {
                limit: config.auth.login_attempts_per_ip,
                window_seconds: config.auth.window_seconds,
            },
            RateLimitScope::Mail => Self {
                limit: config.mail.per_email_per_hour,
                window_seconds: config.mail.window_seconds,
            },
        }
    }

    pub fn window_millis(&self) -> i64 {
        self.window_seconds as i64 * 1000
    }
}
