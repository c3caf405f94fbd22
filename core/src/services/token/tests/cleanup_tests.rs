//! Tests for the cleanup cycle

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::domain::entities::trusted_device::TrustedDevice;
use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use crate::repositories::{
    InMemoryTokenRepository, InMemoryTrustedDeviceRepository, InMemoryVerificationTokenRepository,
    TokenRepository, TrustedDeviceRepository, VerificationTokenRepository,
};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

struct Fixture {
    tokens: Arc<InMemoryTokenRepository>,
    verification_tokens: Arc<InMemoryVerificationTokenRepository>,
    devices: Arc<InMemoryTrustedDeviceRepository>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            tokens: Arc::new(InMemoryTokenRepository::new()),
            verification_tokens: Arc::new(InMemoryVerificationTokenRepository::new()),
            devices: Arc::new(InMemoryTrustedDeviceRepository::new()),
        }
    }

    fn service(&self, config: TokenCleanupConfig) -> TokenCleanupService {
        TokenCleanupService::new(
            self.tokens.clone(),
            self.verification_tokens.clone(),
            self.devices.clone(),
            config,
        )
    }
}

#[tokio::test]
async fn test_cleanup_removes_expired_records() {
    let fixture = Fixture::new();
    let user_id = Uuid::new_v4();

    let mut expired_refresh =
        RefreshToken::new(user_id, "h1".to_string(), "family".to_string(), Duration::days(7));
    expired_refresh.expires_at = Utc::now() - Duration::hours(1);
    fixture.tokens.save_refresh_token(expired_refresh).await.unwrap();
    fixture
        .tokens
        .save_refresh_token(RefreshToken::new(
            user_id,
            "h2".to_string(),
            "family".to_string(),
            Duration::days(7),
        ))
        .await
        .unwrap();
    fixture
        .tokens
        .blacklist_token("jti", Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    let mut expired_code = VerificationToken::new(
        "ana@example.com".to_string(),
        Some(user_id),
        "code-hash".to_string(),
        TokenPurpose::TwoFactor,
        Duration::minutes(5),
    );
    expired_code.expires_at = Utc::now() - Duration::minutes(1);
    fixture.verification_tokens.save(expired_code).await.unwrap();

    let mut expired_device =
        TrustedDevice::new(user_id, "device-hash".to_string(), None, None, Duration::days(30));
    expired_device.expires_at = Utc::now() - Duration::days(1);
    fixture.devices.save(expired_device).await.unwrap();

    let result = fixture
        .service(TokenCleanupConfig::default())
        .run_cleanup()
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 1);
    assert_eq!(result.blacklist_entries_deleted, 1);
    assert_eq!(result.verification_tokens_deleted, 1);
    assert_eq!(result.trusted_devices_deleted, 1);
    assert_eq!(result.total_cleaned(), 4);
    assert_eq!(fixture.tokens.find_by_user_id(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let fixture = Fixture::new();
    let mut expired =
        TrustedDevice::new(Uuid::new_v4(), "hash".to_string(), None, None, Duration::days(30));
    expired.expires_at = Utc::now() - Duration::days(1);
    let saved = fixture.devices.save(expired).await.unwrap();

    let result = fixture
        .service(TokenCleanupConfig {
            enabled: false,
            ..Default::default()
        })
        .run_cleanup()
        .await
        .unwrap();

    assert_eq!(result.total_cleaned(), 0);
    assert!(fixture.devices.find_by_id(saved.id).await.unwrap().is_some());
}
