//! Periodic cleanup of expired session-security records
//!
//! Expired refresh tokens, blacklist entries, mailed verification tokens and
//! trusted devices are removed on a fixed interval so lookup tables stay small.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{TokenRepository, TrustedDeviceRepository, VerificationTokenRepository};

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

/// Service for cleaning up expired tokens, codes and devices
pub struct TokenCleanupService {
    tokens: Arc<dyn TokenRepository>,
    verification_tokens: Arc<dyn VerificationTokenRepository>,
    devices: Arc<dyn TrustedDeviceRepository>,
    config: TokenCleanupConfig,
}

impl TokenCleanupService {
    /// Create a new token cleanup service
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        verification_tokens: Arc<dyn VerificationTokenRepository>,
        devices: Arc<dyn TrustedDeviceRepository>,
        config: TokenCleanupConfig,
    ) -> Self {
        Self {
            tokens,
            verification_tokens,
            devices,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Each step runs even when an earlier one fails; failures are collected
    /// in [`CleanupResult::errors`].
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting token cleanup cycle");

        let mut result = CleanupResult::default();

        match self.tokens.delete_expired_tokens().await {
            Ok(count) => result.expired_tokens_deleted = count,
            Err(e) => {
                error!("Failed to cleanup expired tokens: {}", e);
                result.errors.push(format!("Token cleanup error: {}", e));
            }
        }

        match self.tokens.cleanup_blacklist().await {
            Ok(count) => result.blacklist_entries_deleted = count,
            Err(e) => {
                error!("Failed to cleanup blacklist: {}", e);
                result.errors.push(format!("Blacklist cleanup error: {}", e));
            }
        }

        match self.verification_tokens.delete_expired().await {
            Ok(count) => result.verification_tokens_deleted = count,
            Err(e) => {
                error!("Failed to cleanup verification tokens: {}", e);
                result
                    .errors
                    .push(format!("Verification token cleanup error: {}", e));
            }
        }

        match self.devices.delete_expired().await {
            Ok(count) => result.trusted_devices_deleted = count,
            Err(e) => {
                error!("Failed to cleanup trusted devices: {}", e);
                result
                    .errors
                    .push(format!("Trusted device cleanup error: {}", e));
            }
        }

        info!(
            event = "token_cleanup",
            refresh_tokens = result.expired_tokens_deleted,
            blacklist = result.blacklist_entries_deleted,
            verification_tokens = result.verification_tokens_deleted,
            trusted_devices = result.trusted_devices_deleted,
            "Token cleanup completed"
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// This spawns a tokio task that runs cleanup at regular intervals
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.is_success() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: usize,
    /// Number of expired blacklist entries deleted
    pub blacklist_entries_deleted: usize,
    /// Number of expired verification tokens and codes deleted
    pub verification_tokens_deleted: usize,
    /// Number of expired trusted devices deleted
    pub trusted_devices_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.expired_tokens_deleted
            + self.blacklist_entries_deleted
            + self.verification_tokens_deleted
            + self.trusted_devices_deleted
    }
}
