pub mod backup_code;
pub mod instructor;
pub mod token;
pub mod trusted_device;
pub mod user;
pub mod verification_token;

pub use backup_code::{BackupCodeRepository, InMemoryBackupCodeRepository};
pub use instructor::{InMemoryInstructorRepository, InstructorRepository};
pub use token::{InMemoryTokenRepository, TokenRepository};
pub use trusted_device::{InMemoryTrustedDeviceRepository, TrustedDeviceRepository};
pub use user::{InMemoryUserRepository, UserRepository};
pub use verification_token::{InMemoryVerificationTokenRepository, VerificationTokenRepository};
