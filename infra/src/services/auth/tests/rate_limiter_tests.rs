//! Unit tests for the rate limiters

use gm_core::services::auth::{RateLimitScope, RateLimiterTrait};
use gm_shared::config::{AuthRateLimits, MailRateLimits};
use gm_shared::RateLimitConfig;

use crate::services::auth::rate_limiter::hash_identifier;
use crate::services::auth::{InMemoryRateLimiter, ScopeLimit};

fn config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        auth: AuthRateLimits {
            login_attempts_per_email: 3,
            login_attempts_per_ip: 5,
            window_seconds: 600,
        },
        mail: MailRateLimits {
            per_email_per_hour: 2,
            window_seconds: 3600,
        },
    }
}

#[test]
fn test_scope_limits_follow_config() {
    let config = config();
    assert_eq!(
        ScopeLimit::for_scope(&config, RateLimitScope::LoginEmail),
        ScopeLimit { limit: 3, window_seconds: 600 }
    );
    assert_eq!(ScopeLimit::for_scope(&config, RateLimitScope::LoginIp).limit, 5);
    assert_eq!(
        ScopeLimit::for_scope(&config, RateLimitScope::Mail).window_millis(),
        3_600_000
    );
}

#[test]
fn test_identifier_hash_is_normalized() {
    assert_eq!(hash_identifier("Ana@Example.com "), hash_identifier("ana@example.com"));
    assert_eq!(hash_identifier("ana@example.com").len(), 64);
    assert!(!hash_identifier("ana@example.com").contains("ana"));
}

#[tokio::test]
async fn test_memory_limiter_blocks_at_limit() {
    let limiter = InMemoryRateLimiter::new(config());
    let email = "ana@example.com";

    for _ in 0..2 {
        limiter.increment_counter(RateLimitScope::LoginEmail, email).await.unwrap();
        assert!(!limiter.check_rate_limit(RateLimitScope::LoginEmail, email).await.unwrap());
    }
    let count = limiter.increment_counter(RateLimitScope::LoginEmail, email).await.unwrap();

    assert_eq!(count, 3);
    assert!(limiter.check_rate_limit(RateLimitScope::LoginEmail, email).await.unwrap());
    assert!(!limiter.check_rate_limit(RateLimitScope::LoginIp, email).await.unwrap());
    assert!(!limiter.check_rate_limit(RateLimitScope::LoginEmail, "bo@example.com").await.unwrap());
}

#[tokio::test]
async fn test_memory_limiter_reset() {
    let limiter = InMemoryRateLimiter::new(config());
    for _ in 0..2 {
        limiter.increment_counter(RateLimitScope::Mail, "ana@example.com").await.unwrap();
    }
    assert!(limiter.check_rate_limit(RateLimitScope::Mail, "ana@example.com").await.unwrap());

    limiter.reset_counter(RateLimitScope::Mail, "ana@example.com").await.unwrap();

    assert!(!limiter.check_rate_limit(RateLimitScope::Mail, "ana@example.com").await.unwrap());
    assert_eq!(
        limiter.get_rate_limit_reset_time(RateLimitScope::Mail, "ana@example.com").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_memory_limiter_reset_time_within_window() {
    let limiter = InMemoryRateLimiter::new(config());
    limiter.increment_counter(RateLimitScope::LoginIp, "10.0.0.1").await.unwrap();

    let reset = limiter
        .get_rate_limit_reset_time(RateLimitScope::LoginIp, "10.0.0.1")
        .await
        .unwrap()
        .unwrap();
    assert!(reset > 590 && reset <= 600);
}

#[tokio::test]
async fn test_disabled_limiter_never_blocks() {
    let mut config = config();
    config.enabled = false;
    let limiter = InMemoryRateLimiter::new(config);

    for _ in 0..10 {
        limiter.increment_counter(RateLimitScope::LoginEmail, "ana@example.com").await.unwrap();
    }
    assert!(!limiter.check_rate_limit(RateLimitScope::LoginEmail, "ana@example.com").await.unwrap());
}

#[tokio::test]
async fn test_memory_limiter_forgets_identifiers_outside_window() {
    let mut config = config();
    config.auth.window_seconds = 0;
    let limiter = InMemoryRateLimiter::new(config);

    limiter.increment_counter(RateLimitScope::LoginEmail, "ana@example.com").await.unwrap();
    limiter.increment_counter(RateLimitScope::LoginEmail, "bo@example.com").await.unwrap();
    assert_eq!(limiter.tracked_keys().await, 1);

    assert!(!limiter.check_rate_limit(RateLimitScope::LoginEmail, "bo@example.com").await.unwrap());
    assert_eq!(limiter.tracked_keys().await, 0);
}

#[tokio::test]
async fn test_memory_limiter_keeps_identifiers_inside_window() {
    let limiter = InMemoryRateLimiter::new(config());

    limiter.increment_counter(RateLimitScope::LoginEmail, "ana@example.com").await.unwrap();
    limiter.increment_counter(RateLimitScope::Mail, "bo@example.com").await.unwrap();
    assert!(!limiter.check_rate_limit(RateLimitScope::LoginIp, "10.0.0.1").await.unwrap());

    assert_eq!(limiter.tracked_keys().await, 2);
}
