//! Outbound mail seam

use async_trait::async_trait;

/// A rendered email ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Trait for mail provider integration
#[async_trait]
pub trait MailServiceTrait: Send + Sync {
    /// Send a message
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Provider message id
    /// * `Err(String)` - Provider error description
    async fn send_mail(&self, message: &MailMessage) -> Result<String, String>;
}
