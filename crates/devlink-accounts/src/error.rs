//! Error types for account and authentication operations.

use thiserror::Error;

use crate::user::UserId;
use crate::validation::{FieldError, FieldErrorCode};

/// Result type for account operations.
pub type Result<T> = std::result::Result<T, AccountError>;

/// Errors that can occur in the credential store and auth service.
#[derive(Debug, Error)]
pub enum AccountError {
    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Email already registered.
    #[error("email already registered: {0}")]
    EmailExists(String),

    /// One or more request fields failed validation.
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No token was presented on a private route.
    #[error("no token provided")]
    MissingToken,

    /// Token is malformed, expired, or carries a bad signature.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AccountError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UserNotFound(_) => 404,
            Self::EmailExists(_) => 400,
            Self::Validation(_) => 400,
            Self::InvalidCredentials => 400,
            Self::MissingToken => 401,
            Self::InvalidToken(_) => 401,
            Self::Crypto(_) => 500,
            Self::Storage(_) => 500,
        }
    }

    /// Get the message shown to API clients.
    pub fn public_message(&self) -> &str {
        match self {
            Self::UserNotFound(_) => "User not found",
            Self::EmailExists(_) => "User already exists",
            Self::Validation(_) => "Validation failed",
            Self::InvalidCredentials => "Invalid Credentials",
            Self::MissingToken => "No token, authorization denied",
            Self::InvalidToken(_) => "Token is not valid",
            Self::Crypto(_) => "Server Error",
            Self::Storage(_) => "Server Error",
        }
    }

    /// Field-level errors for responses rendered as `{errors: [...]}`.
    ///
    /// Registration and login failures are reported this way so the client
    /// can surface each message as a notification.
    pub fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::EmailExists(_) => Some(vec![FieldError::new(
                "email",
                FieldErrorCode::AlreadyExists,
                self.public_message(),
            )]),
            Self::InvalidCredentials => Some(vec![FieldError::new(
                "email",
                FieldErrorCode::Invalid,
                self.public_message(),
            )]),
            _ => None,
        }
    }

    /// Returns true if the error means the caller is not authenticated.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::MissingToken | Self::InvalidToken(_))
    }
}
