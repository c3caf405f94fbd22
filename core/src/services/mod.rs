//! Business services containing domain logic and use cases.

pub mod access;
pub mod admin;
pub mod auth;
pub mod instructor;
pub mod mail;
pub mod token;
pub mod trusted_device;
pub mod two_factor;
pub mod verification;

// Re-export commonly used types
pub use access::{ensure_active, ensure_role};
pub use admin::AdminUserService;
pub use auth::{
    AuthDependencies, AuthService, AuthServiceConfig, LoginRequest, PasswordHasher,
    RateLimitScope, RateLimiterTrait, RegisterRequest,
};
pub use instructor::InstructorVerificationService;
pub use mail::{MailComposer, MailMessage, MailServiceTrait};
pub use token::{
    CleanupResult, TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
pub use trusted_device::TrustedDeviceService;
pub use two_factor::TwoFactorService;
pub use verification::{IssuedCode, VerificationServiceConfig, VerificationTokenService};
