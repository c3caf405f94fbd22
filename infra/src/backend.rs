//! Storage backend wiring
//!
//! Builds the repositories and rate limiter for the configured
//! `storage` backend: MySQL plus Redis, or process-local memory.

use std::sync::Arc;

use gm_core::repositories::{
    BackupCodeRepository, InMemoryBackupCodeRepository, InMemoryInstructorRepository,
    InMemoryTokenRepository, InMemoryTrustedDeviceRepository, InMemoryUserRepository,
    InMemoryVerificationTokenRepository, InstructorRepository, TokenRepository,
    TrustedDeviceRepository, UserRepository, VerificationTokenRepository,
};
use gm_core::services::auth::RateLimiterTrait;
use gm_shared::{AppConfig, StorageBackend};

use crate::cache::RedisClient;
use crate::database::{
    DatabasePool, MySqlBackupCodeRepository, MySqlInstructorRepository, MySqlTokenRepository,
    MySqlTrustedDeviceRepository, MySqlUserRepository, MySqlVerificationTokenRepository,
};
use crate::services::auth::{InMemoryRateLimiter, RedisRateLimiter};
use crate::InfrastructureError;

/// One implementation of every repository trait
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub verification_tokens: Arc<dyn VerificationTokenRepository>,
    pub backup_codes: Arc<dyn BackupCodeRepository>,
    pub trusted_devices: Arc<dyn TrustedDeviceRepository>,
    pub instructors: Arc<dyn InstructorRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            tokens: Arc::new(InMemoryTokenRepository::new()),
            verification_tokens: Arc::new(InMemoryVerificationTokenRepository::new()),
            backup_codes: Arc::new(InMemoryBackupCodeRepository::new()),
            trusted_devices: Arc::new(InMemoryTrustedDeviceRepository::new()),
            instructors: Arc::new(InMemoryInstructorRepository::new()),
        }
    }

    pub fn mysql(database: &DatabasePool) -> Self {
        let pool = database.get_pool().clone();
        Self {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            tokens: Arc::new(MySqlTokenRepository::new(pool.clone())),
            verification_tokens: Arc::new(MySqlVerificationTokenRepository::new(pool.clone())),
            backup_codes: Arc::new(MySqlBackupCodeRepository::new(pool.clone())),
            trusted_devices: Arc::new(MySqlTrustedDeviceRepository::new(pool.clone())),
            instructors: Arc::new(MySqlInstructorRepository::new(pool)),
        }
    }
}

/// Everything the services need from persistence
#[derive(Clone)]
pub struct Backend {
    pub repositories: Repositories,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
    database: Option<DatabasePool>,
    cache: Option<Arc<RedisClient>>,
}

impl Backend {
    /// Process-local backend; state is lost on restart
    pub fn in_memory(config: &AppConfig) -> Self {
        Self {
            repositories: Repositories::in_memory(),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
            database: None,
            cache: None,
        }
    }

    /// Connect to the configured backend
    pub async fn connect(config: &AppConfig) -> Result<Self, InfrastructureError> {
        match config.storage {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is not persisted");
                Ok(Self::in_memory(config))
            }
            StorageBackend::Mysql => {
                let database = DatabasePool::new(config.database.clone()).await?;
                if config.database.run_migrations {
                    database.run_migrations().await?;
                }
                let cache = Arc::new(RedisClient::new(config.cache.clone()).await?);

                Ok(Self {
                    repositories: Repositories::mysql(&database),
                    rate_limiter: Arc::new(RedisRateLimiter::new(
                        cache.clone(),
                        config.rate_limit.clone(),
                    )),
                    database: Some(database),
                    cache: Some(cache),
                })
            }
        }
    }

    pub fn storage_name(&self) -> &'static str {
        if self.database.is_some() {
            "mysql"
        } else {
            "memory"
        }
    }

    /// Health of each external dependency, by name
    pub async fn health(&self) -> Vec<(&'static str, bool)> {
        let mut checks = Vec::new();
        if let Some(database) = &self.database {
            checks.push(("database", database.health_check().await.unwrap_or(false)));
        }
        if let Some(cache) = &self.cache {
            checks.push(("cache", cache.health_check().await.unwrap_or(false)));
        }
        checks
    }

    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_has_no_external_checks() {
        let backend = Backend::connect(&AppConfig::development()).await.unwrap();

        assert_eq!(backend.storage_name(), "memory");
        assert!(backend.health().await.is_empty());
    }

    #[tokio::test]
    async fn test_memory_repositories_are_live() {
        let backend = Backend::in_memory(&AppConfig::development());
        let user = gm_core::domain::entities::user::User::new(
            "Ana",
            "ana@example.com",
            None,
            gm_core::domain::entities::user::UserRole::Student,
        );
        backend.repositories.users.create(user.clone()).await.unwrap();

        let clone = backend.clone();
        assert!(clone.repositories.users.find_by_id(user.id).await.unwrap().is_some());
    }
}
