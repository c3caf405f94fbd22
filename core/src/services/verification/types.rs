//! Types for verification service results

use chrono::{DateTime, Utc};

/// A freshly issued two-factor code, ready to be mailed
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The plaintext 6-digit code
    pub code: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the user can request another code
    pub next_resend_at: DateTime<Utc>,
}
