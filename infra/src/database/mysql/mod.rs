//! MySQL repository implementations

mod backup_code_repository_impl;
mod instructor_repository_impl;
mod token_repository_impl;
mod trusted_device_repository_impl;
mod user_repository_impl;
mod verification_token_repository_impl;

pub use backup_code_repository_impl::MySqlBackupCodeRepository;
pub use instructor_repository_impl::MySqlInstructorRepository;
pub use token_repository_impl::MySqlTokenRepository;
pub use trusted_device_repository_impl::MySqlTrustedDeviceRepository;
pub use user_repository_impl::MySqlUserRepository;
pub use verification_token_repository_impl::MySqlVerificationTokenRepository;

use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};
use uuid::Uuid;

use gm_core::errors::DomainError;

/// Read a column, mapping decode failures to an internal error
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get::<T, _>(name)
        .map_err(|e| DomainError::internal(&format!("Failed to get {}", name), e))
}

/// UUIDs are stored as CHAR(36)
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let value: String = column(row, name)?;
    Uuid::parse_str(&value).map_err(|e| DomainError::internal(&format!("Invalid UUID in {}", name), e))
}

pub(crate) fn optional_uuid_column(row: &MySqlRow, name: &str) -> Result<Option<Uuid>, DomainError> {
    let value: Option<String> = column(row, name)?;
    value
        .map(|v| Uuid::parse_str(&v))
        .transpose()
        .map_err(|e| DomainError::internal(&format!("Invalid UUID in {}", name), e))
}

/// Parse an enum column through its `FromStr` implementation
pub(crate) fn enum_column<T>(row: &MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = String>,
{
    let value: String = column(row, name)?;
    value.parse::<T>().map_err(|e| DomainError::Internal { message: e })
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}
