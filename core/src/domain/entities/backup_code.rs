//! Single-use backup codes that stand in for the mailed two-factor code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::secrets;

/// Uppercase alphabet without the look-alikes 0/O and 1/I
pub const BACKUP_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Characters on each side of the dash
const GROUP_LENGTH: usize = 4;

/// A stored backup code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupCode {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hash of the normalized code
    pub code_hash: String,

    /// Timestamp when the code was generated
    pub created_at: DateTime<Utc>,

    /// When the code was redeemed
    pub used_at: Option<DateTime<Utc>>,
}

impl BackupCode {
    /// Creates a stored backup code from its plaintext
    pub fn new(user_id: Uuid, plaintext: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            code_hash: Self::hash(plaintext),
            created_at: Utc::now(),
            used_at: None,
        }
    }

    /// Generates a plaintext code formatted as `XXXX-XXXX`
    pub fn generate_plaintext() -> String {
        let raw = secrets::random_from_alphabet(BACKUP_CODE_ALPHABET, GROUP_LENGTH * 2);
        format!("{}-{}", &raw[..GROUP_LENGTH], &raw[GROUP_LENGTH..])
    }

    /// Canonical form used before hashing: uppercase with separators and
    /// whitespace removed
    pub fn normalize(input: &str) -> String {
        input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Hash of the normalized code
    pub fn hash(input: &str) -> String {
        secrets::sha256_hex(&Self::normalize(input))
    }

    /// Whether the code was already redeemed
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Redeems the code
    pub fn mark_used(&mut self) {
        self.used_at = Some(Utc::now());
    }
}
