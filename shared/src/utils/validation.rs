//! Common validation utilities

use serde::Serialize;
use std::collections::HashMap;

/// Minimum password length
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length (bcrypt ignores bytes past 72, the cap keeps input sane)
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validation error with field-level details
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Collection of validation errors
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message, code));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn to_field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
        for error in &self.errors {
            field_errors
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        field_errors
    }
}

/// Check a password against the account password policy.
///
/// Passwords must be 8 to 128 characters long and contain at least one
/// letter and one digit.
///
/// # Returns
///
/// * `Ok(())` - Password is acceptable
/// * `Err(String)` - Human-readable reason for rejection
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LENGTH
        ));
    }
    if length > PASSWORD_MAX_LENGTH {
        return Err(format!(
            "Password must be at most {} characters",
            PASSWORD_MAX_LENGTH
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }
    Ok(())
}

/// Common validation functions
pub mod validators {
    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.trim().chars().count();
        len >= min && len <= max
    }

    /// Check if a URL is valid (basic check)
    pub fn is_valid_url(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("secret123").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password(&format!("a1{}", "x".repeat(127))).is_err());
    }

    #[test]
    fn test_validation_errors_grouping() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", "Invalid email", "EMAIL_INVALID");
        errors.add_error("email", "Email taken", "EMAIL_TAKEN");
        errors.add_error("password", "Too short", "PASSWORD_SHORT");

        let fields = errors.to_field_errors();
        assert_eq!(fields["email"].len(), 2);
        assert_eq!(errors.errors().len(), 3);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_validators() {
        assert!(validators::not_empty(" a "));
        assert!(!validators::not_empty("   "));
        assert!(validators::length_between("abc", 1, 3));
        assert!(validators::is_valid_url("https://gurmania.com"));
    }
}
