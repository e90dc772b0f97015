//! Email and password validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length (bcrypt truncates beyond 72 bytes)
pub const MAX_PASSWORD_LENGTH: usize = 72;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Check whether a string looks like an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Normalize an email for storage and lookup: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check whether a password satisfies the length policy
pub fn is_valid_password(password: &str) -> bool {
    let len = password.len();
    (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("learner@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Learner@Example.COM "), "learner@example.com");
    }

    #[test]
    fn test_password_length_policy() {
        assert!(!is_valid_password("short"));
        assert!(is_valid_password("pw123456"));
        assert!(!is_valid_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)));
    }
}
