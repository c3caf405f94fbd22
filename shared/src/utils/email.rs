//! Email address helpers

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex must compile")
});

/// Normalize an email address for storage and lookup (trimmed, lowercase)
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check whether an email address is syntactically valid
pub fn is_valid(email: &str) -> bool {
    let email = email.trim();
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Mask an email address for logs and client hints.
///
/// Keeps the first character of the local part and the full domain,
/// e.g. `jane.doe@example.com` becomes `j***@example.com`.
pub fn mask(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("student@gurmania.com"));
        assert!(is_valid("a.b+tag@mail.example.co"));
        assert!(!is_valid("no-at-sign.com"));
        assert!(!is_valid("user@localhost"));
        assert!(!is_valid("user@@example.com"));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("jane.doe@example.com"), "j***@example.com");
        assert_eq!(mask("invalid"), "***");
    }
}
