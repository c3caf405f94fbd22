//! Browsers remembered after a completed two-factor login.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default trust period in days
pub const DEFAULT_TRUST_DAYS: i64 = 30;

/// Random bytes in the cookie secret
pub const DEVICE_SECRET_BYTES: usize = 32;

/// Maximum stored label length
const MAX_LABEL_LENGTH: usize = 255;

/// A trusted device record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedDevice {
    /// Device identifier, the public half of the cookie
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hash of the cookie secret
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// Human-readable label (usually the user agent)
    pub label: Option<String>,

    /// Client IP at the time the device was trusted
    pub ip_address: Option<String>,

    /// Timestamp when the device was trusted
    pub created_at: DateTime<Utc>,

    /// Last login that skipped the second factor thanks to this device
    pub last_used_at: DateTime<Utc>,

    /// End of the trust period
    pub expires_at: DateTime<Utc>,
}

impl TrustedDevice {
    /// Creates a new trusted device
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        label: Option<String>,
        ip_address: Option<String>,
        trust_period: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            label: label.map(|l| l.chars().take(MAX_LABEL_LENGTH).collect()),
            ip_address,
            created_at: now,
            last_used_at: now,
            expires_at: now + trust_period,
        }
    }

    /// Checks if the trust period is over
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Cookie value handed to the browser
    pub fn cookie_value(&self, secret: &str) -> String {
        format!("{}.{}", self.id, secret)
    }

    /// Splits a cookie value into device id and secret
    pub fn parse_cookie(value: &str) -> Option<(Uuid, &str)> {
        let (id, secret) = value.trim().split_once('.')?;
        if secret.is_empty() {
            return None;
        }
        Uuid::parse_str(id).ok().map(|id| (id, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_round_trip() {
        let device = TrustedDevice::new(
            Uuid::new_v4(),
            "hash".to_string(),
            Some("Firefox".to_string()),
            None,
            Duration::days(DEFAULT_TRUST_DAYS),
        );
        let cookie = device.cookie_value("s3cr3t");
        let (id, secret) = TrustedDevice::parse_cookie(&cookie).unwrap();
        assert_eq!(id, device.id);
        assert_eq!(secret, "s3cr3t");
    }

    #[test]
    fn test_parse_rejects_malformed_cookies() {
        assert!(TrustedDevice::parse_cookie("").is_none());
        assert!(TrustedDevice::parse_cookie("not-a-uuid.secret").is_none());
        assert!(TrustedDevice::parse_cookie(&format!("{}.", Uuid::new_v4())).is_none());
        assert!(TrustedDevice::parse_cookie(&Uuid::new_v4().to_string()).is_none());
    }

    #[test]
    fn test_expiry() {
        let mut device = TrustedDevice::new(
            Uuid::new_v4(),
            "hash".to_string(),
            None,
            None,
            Duration::days(1),
        );
        assert!(!device.is_expired());
        device.expires_at = Utc::now() - Duration::seconds(1);
        assert!(device.is_expired());
    }

    #[test]
    fn test_label_is_truncated() {
        let device = TrustedDevice::new(
            Uuid::new_v4(),
            "hash".to_string(),
            Some("x".repeat(400)),
            None,
            Duration::days(1),
        );
        assert_eq!(device.label.unwrap().len(), 255);
    }
}
