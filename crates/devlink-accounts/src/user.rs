//! User account types and request validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::{AccountError, Result};
use crate::validation::{non_blank, FieldError, FieldErrorCode};

/// Unique identifier for a user.
pub type UserId = Uuid;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A stored user account.
///
/// This is the internal document and includes the password hash. Anything
/// sent to a client goes through [`User::to_public`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized (trimmed, lower-cased) email, unique across users.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Avatar URL derived from the email.
    pub avatar_url: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user. `email` must already be normalized.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let avatar_url = gravatar_url(&email);
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            avatar_url,
            created_at: Utc::now(),
        }
    }

    /// Convert to the outward view, dropping the password hash.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// User as returned by the API. Has no password field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Request to register a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Plaintext password.
    #[serde(default)]
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Create a request from plain values.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Check every field and return the normalized `(name, email, password)`.
    ///
    /// All failing fields are reported together.
    pub fn validate(&self) -> Result<(String, String, String)> {
        let mut errors = Vec::new();

        let name = non_blank(self.name.as_deref());
        if name.is_none() {
            errors.push(FieldError::missing("name", "Name is required"));
        }

        let email = self.email.as_deref().and_then(valid_email);
        if email.is_none() {
            errors.push(FieldError::new(
                "email",
                FieldErrorCode::Invalid,
                "Please include a valid email",
            ));
        }

        let password = self.password.as_deref().unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                FieldErrorCode::TooShort,
                format!(
                    "Please enter a password with {} or more characters",
                    MIN_PASSWORD_LEN
                ),
            ));
        }

        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => {
                Ok((name.to_string(), email, password.to_string()))
            }
            _ => Err(AccountError::Validation(errors)),
        }
    }
}

/// Request to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Plaintext password.
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Create a request from plain values.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Check the fields and return the normalized `(email, password)`.
    pub fn validate(&self) -> Result<(String, String)> {
        let mut errors = Vec::new();

        let email = self.email.as_deref().and_then(valid_email);
        if email.is_none() {
            errors.push(FieldError::new(
                "email",
                FieldErrorCode::Invalid,
                "Please include a valid email",
            ));
        }

        let password = self.password.as_deref().filter(|p| !p.is_empty());
        if password.is_none() {
            errors.push(FieldError::missing("password", "Password is required"));
        }

        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password.to_string())),
            _ => Err(AccountError::Validation(errors)),
        }
    }
}

/// Trim and lower-case an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize and syntax-check an email address.
fn valid_email(email: &str) -> Option<String> {
    let normalized = normalize_email(email);
    normalized.validate_email().then_some(normalized)
}

/// Build the Gravatar URL for a normalized email.
///
/// Gravatar accepts SHA-256 hashes of the lower-cased address.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}
