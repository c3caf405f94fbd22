//! Inputs of the authentication flows

use crate::domain::entities::user::UserRole;

/// New account data
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// One login attempt, including everything the second factor may need
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Mailed two-factor code
    pub code: Option<String>,
    /// Backup code, used instead of the mailed code
    pub backup_code: Option<String>,
    /// Remember this browser after a successful second factor
    pub trust_device: bool,
    /// Trusted-device cookie sent by the browser
    pub device_cookie: Option<String>,
    /// Human readable device description, usually the User-Agent
    pub device_label: Option<String>,
    pub client_ip: Option<String>,
}
