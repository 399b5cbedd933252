//! Local credential checks, run before any network exchange.

use regex::Regex;
use std::sync::OnceLock;

use super::LoginError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Validate email and password in the order the login form reports them
pub fn validate_credentials(email: &str, password: &str) -> Result<(), LoginError> {
    if email.is_empty() {
        return Err(LoginError::EmailRequired);
    }
    if !email_pattern().is_match(email) {
        return Err(LoginError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(LoginError::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LoginError::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_credentials() {
        assert!(validate_credentials("ops@site.com", "secret1").is_ok());
        assert!(validate_credentials("a@b.c", "123456").is_ok());
    }

    #[test]
    fn test_rejects_malformed_emails() {
        for email in ["plain", "no-at.example.com", "user@nodot", "@.", "a @b.c"] {
            let err = validate_credentials(email, "secret1").unwrap_err();
            assert_eq!(err, LoginError::InvalidEmail, "email {email:?}");
            assert_eq!(err.to_string(), "Please enter a valid email address.");
        }
    }

    #[test]
    fn test_rejects_short_password() {
        let err = validate_credentials("ops@site.com", "12345").unwrap_err();
        assert_eq!(err, LoginError::PasswordTooShort);
        assert_eq!(err.to_string(), "Password must be at least 6 characters.");
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            validate_credentials("", "secret1").unwrap_err().to_string(),
            "Email is required."
        );
        assert_eq!(
            validate_credentials("ops@site.com", "").unwrap_err().to_string(),
            "Password is required."
        );
    }
}
