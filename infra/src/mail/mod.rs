//! Mail Service Module
//!
//! Implementations of the core `MailServiceTrait`:
//!
//! - **Mock**: logs and records messages, for development and tests
//! - **Resend**: production delivery through the Resend HTTPS API
//!
//! Recipient addresses are masked in logs.

pub mod mock;
pub mod resend;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use gm_core::services::mail::MailServiceTrait;
use gm_shared::MailConfig;

use crate::InfrastructureError;

pub use mock::MockMailService;
pub use resend::ResendMailService;

/// Create the mail service named by `config.provider`
///
/// # Errors
///
/// * `Config` - Unknown provider, or a real provider without an API key
pub fn create_mail_service(
    config: &MailConfig,
) -> Result<Arc<dyn MailServiceTrait>, InfrastructureError> {
    match config.provider.to_lowercase().as_str() {
        "mock" => {
            tracing::warn!("Using mock mail service; no mail will be delivered");
            Ok(Arc::new(MockMailService::new()))
        }
        "resend" => Ok(Arc::new(ResendMailService::new(config.clone())?)),
        other => Err(InfrastructureError::Config(format!(
            "Unknown mail provider: {}",
            other
        ))),
    }
}
