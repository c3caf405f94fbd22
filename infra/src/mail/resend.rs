//! Resend mail service implementation
//!
//! Sends through `POST {api_base_url}/emails`. Rate limiting (429), server
//! errors and network failures are retried with exponential backoff; other
//! client errors fail immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use gm_core::services::mail::{MailMessage, MailServiceTrait};
use gm_shared::{email, MailConfig};

use crate::InfrastructureError;

const INITIAL_RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

pub struct ResendMailService {
    client: reqwest::Client,
    config: MailConfig,
    api_key: String,
}

impl ResendMailService {
    pub fn new(config: MailConfig) -> Result<Self, InfrastructureError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("Mail API key is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(from = %config.from_address, "Resend mail service initialized");

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_base_url.trim_end_matches('/'))
    }

    async fn send_once(&self, message: &MailMessage) -> Result<String, SendFailure> {
        let body = SendEmailRequest {
            from: &self.config.from_address,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendFailure::Retryable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let parsed: SendEmailResponse = response
                .json()
                .await
                .map_err(|e| SendFailure::Permanent(format!("Invalid provider response: {}", e)))?;
            return Ok(parsed.id);
        }

        let detail = response.text().await.unwrap_or_default();
        let message = format!("Provider returned {}: {}", status, detail);
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(SendFailure::Retryable(message))
        } else {
            Err(SendFailure::Permanent(message))
        }
    }
}

enum SendFailure {
    Retryable(String),
    Permanent(String),
}

#[async_trait]
impl MailServiceTrait for ResendMailService {
    async fn send_mail(&self, message: &MailMessage) -> Result<String, String> {
        let masked = email::mask(&message.to);
        let attempts_allowed = self.config.max_retries + 1;
        let mut delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(to = %masked, attempt, "Sending mail");

            match self.send_once(message).await {
                Ok(id) => {
                    info!(provider = "resend", to = %masked, message_id = %id, "Mail sent");
                    return Ok(id);
                }
                Err(SendFailure::Retryable(reason)) if attempt < attempts_allowed => {
                    warn!(
                        to = %masked,
                        attempt,
                        reason = %reason,
                        "Mail delivery failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(SendFailure::Retryable(reason)) | Err(SendFailure::Permanent(reason)) => {
                    error!(provider = "resend", to = %masked, attempt, reason = %reason, "Mail delivery failed");
                    return Err(reason);
                }
            }
        }
    }
}
