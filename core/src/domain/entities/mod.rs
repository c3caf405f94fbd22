//! Domain entities representing core business objects.

pub mod backup_code;
pub mod instructor;
pub mod token;
pub mod trusted_device;
pub mod user;
pub mod verification_token;

// Re-export commonly used types
pub use backup_code::{BackupCode, BACKUP_CODE_ALPHABET};
pub use instructor::{InstructorApplication, InstructorProfile, VerificationStatus};
pub use token::{
    Claims, RefreshToken, TokenPair, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER,
    REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use trusted_device::{TrustedDevice, DEFAULT_TRUST_DAYS};
pub use user::{User, UserRole};
pub use verification_token::{TokenPurpose, VerificationToken, CODE_LENGTH, MAX_ATTEMPTS};
