//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Authentication rate limits
    pub auth: AuthRateLimits,

    /// Outbound mail rate limits
    pub mail: MailRateLimits,
}

/// Login attempt limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthRateLimits {
    /// Max login attempts per email within the window
    pub login_attempts_per_email: u32,

    /// Max login attempts per client IP within the window
    pub login_attempts_per_ip: u32,

    /// Sliding window length in seconds
    pub window_seconds: u64,
}

impl Default for AuthRateLimits {
    fn default() -> Self {
        Self {
            login_attempts_per_email: 10,
            login_attempts_per_ip: 50,
            window_seconds: 3600,
        }
    }
}

/// Outbound mail limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailRateLimits {
    /// Max mails of any kind to one address within the window
    pub per_email_per_hour: u32,

    /// Sliding window length in seconds
    #[serde(default = "default_mail_window")]
    pub window_seconds: u64,
}

impl Default for MailRateLimits {
    fn default() -> Self {
        Self {
            per_email_per_hour: 10,
            window_seconds: default_mail_window(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            auth: AuthRateLimits::default(),
            mail: MailRateLimits::default(),
        }
    }
}

impl RateLimitConfig {
    /// Relaxed limits for development
    pub fn development() -> Self {
        Self {
            enabled: true,
            auth: AuthRateLimits {
                login_attempts_per_email: 100,
                login_attempts_per_ip: 500,
                window_seconds: 3600,
            },
            mail: MailRateLimits {
                per_email_per_hour: 100,
                window_seconds: default_mail_window(),
            },
        }
    }

    /// Configuration with limiting switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_mail_window() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.auth.login_attempts_per_email, 10);
        assert_eq!(config.mail.per_email_per_hour, 10);
    }

    #[test]
    fn test_development_is_relaxed() {
        let dev = RateLimitConfig::development();
        let prod = RateLimitConfig::default();
        assert!(dev.auth.login_attempts_per_email > prod.auth.login_attempts_per_email);
        assert!(!RateLimitConfig::disabled().enabled);
    }
}
