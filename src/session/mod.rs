//! Session Management
//!
//! Authentication state, token persistence and local credential validation.

pub mod controller;
pub mod store;
pub mod validate;

pub use controller::{AuthFailure, Authenticator, Session, SessionController};
pub use store::{MemoryTokenStore, StoreError, TokenStore, TOKEN_KEY};
pub use validate::{validate_credentials, MIN_PASSWORD_LEN};

#[cfg(feature = "native")]
pub use store::FileTokenStore;

use thiserror::Error;

/// Login failure carrying the message shown next to the form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Email is required.")]
    EmailRequired,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password is required.")]
    PasswordRequired,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    /// Server-provided message, surfaced verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("Unable to reach the server. Please try again.")]
    Network(String),
}

impl LoginError {
    /// True for failures caught before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmailRequired | Self::InvalidEmail | Self::PasswordRequired | Self::PasswordTooShort
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failures_are_local() {
        assert!(LoginError::EmailRequired.is_validation());
        assert!(LoginError::PasswordTooShort.is_validation());
        assert!(!LoginError::Rejected("Invalid credentials".into()).is_validation());
        assert!(!LoginError::Network("timeout".into()).is_validation());
    }
}
