//! Outbound mail configuration module

use serde::{Deserialize, Serialize};

/// Outbound mail provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Provider name (`mock` or `resend`)
    pub provider: String,

    /// Provider API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Provider API base URL
    pub api_base_url: String,

    /// Public URL of the web application, used to build links in mails
    pub app_url: String,

    /// Retries for transient provider failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Provider request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            api_key: None,
            from_address: String::from("Gurmania <no-reply@gurmania.com>"),
            api_base_url: String::from("https://api.resend.com"),
            app_url: String::from("http://localhost:3000"),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl MailConfig {
    /// Whether mails are only recorded, never delivered
    pub fn is_mock(&self) -> bool {
        self.provider.eq_ignore_ascii_case("mock")
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_request_timeout() -> u64 {
    10
}
