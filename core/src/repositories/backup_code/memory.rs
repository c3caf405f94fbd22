//! In-memory implementation of BackupCodeRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::backup_code::BackupCode;
use crate::errors::DomainError;

use super::trait_::BackupCodeRepository;

/// Process-local backup code store, keyed by user
#[derive(Clone, Default)]
pub struct InMemoryBackupCodeRepository {
    codes: Arc<RwLock<HashMap<Uuid, Vec<BackupCode>>>>,
}

impl InMemoryBackupCodeRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BackupCodeRepository for InMemoryBackupCodeRepository {
    async fn replace_all(&self, user_id: Uuid, codes: Vec<BackupCode>) -> Result<(), DomainError> {
        let mut store = self.codes.write().await;
        store.insert(user_id, codes);
        Ok(())
    }

    async fn find_unused(&self, user_id: Uuid, code_hash: &str) -> Result<Option<BackupCode>, DomainError> {
        let store = self.codes.read().await;
        Ok(store.get(&user_id).and_then(|codes| {
            codes
                .iter()
                .find(|c| !c.is_used() && c.code_hash == code_hash)
                .cloned()
        }))
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut store = self.codes.write().await;
        for codes in store.values_mut() {
            if let Some(code) = codes.iter_mut().find(|c| c.id == id) {
                if code.is_used() {
                    return Ok(false);
                }
                code.mark_used();
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn count_unused(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let store = self.codes.read().await;
        Ok(store
            .get(&user_id)
            .map(|codes| codes.iter().filter(|c| !c.is_used()).count())
            .unwrap_or(0))
    }

    async fn delete_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut store = self.codes.write().await;
        Ok(store.remove(&user_id).map(|codes| codes.len()).unwrap_or(0))
    }
}
