//! Mock Mail Service Implementation
//!
//! Logs messages instead of sending them and keeps every message in memory so
//! tests can read the links and codes that would have been mailed.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use gm_core::services::mail::{MailMessage, MailServiceTrait};
use gm_shared::email;

#[derive(Clone, Default)]
pub struct MockMailService {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    simulate_failure: Arc<AtomicBool>,
}

impl MockMailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail, as a provider outage would
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// All messages sent so far
    pub fn sent(&self) -> Vec<MailMessage> {
        self.messages().clone()
    }

    /// Number of messages sent to `to`
    pub fn count_to(&self, to: &str) -> usize {
        self.messages().iter().filter(|m| m.to == to).count()
    }

    /// The most recent message sent to `to`
    pub fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.messages().iter().rev().find(|m| m.to == to).cloned()
    }

    fn messages(&self) -> MutexGuard<'_, Vec<MailMessage>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MailServiceTrait for MockMailService {
    async fn send_mail(&self, message: &MailMessage) -> Result<String, String> {
        let masked = email::mask(&message.to);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(provider = "mock", to = %masked, "Mock mail service simulating failure");
            return Err("Simulated mail delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.messages().push(message.clone());

        info!(
            target: "mail_service",
            provider = "mock",
            to = %masked,
            subject = %message.subject,
            message_id = %message_id,
            "Mail recorded by mock service"
        );
        Ok(message_id)
    }
}
