//! # Devlink Accounts
//!
//! Credential store and auth service for the Devlink developer network.
//!
//! This crate provides:
//! - **User Accounts**: Registration with unique, normalized emails
//! - **Password Hashing**: Argon2id, plaintext is never stored
//! - **Bearer Tokens**: Signed, stateless tokens asserting a user ID
//! - **Header Parsing**: `x-auth-token` and `Authorization: Bearer`
//!
//! ## Example
//!
//! ```rust
//! use devlink_accounts::{AccountStore, LoginRequest, RegisterRequest, TokenIssuer};
//!
//! let store = AccountStore::new(TokenIssuer::new(b"change-me", 3600));
//!
//! // Register a user; a token comes back with the account
//! let (user, _token) = store
//!     .register(&RegisterRequest::new("Ada", "ada@example.com", "s3cret!"))
//!     .unwrap();
//!
//! // Log in later
//! let token = store
//!     .authenticate(&LoginRequest::new("ada@example.com", "s3cret!"))
//!     .unwrap();
//!
//! // Verification needs only the secret
//! assert_eq!(store.verify_token(&token).unwrap(), user.id);
//! ```

pub mod error;
pub mod middleware;
pub mod password;
pub mod store;
pub mod token;
pub mod user;
pub mod validation;

// Re-export main types
pub use error::{AccountError, Result};
pub use middleware::{
    parse_authorization_header, token_from_headers, AuthorizationValue, AUTH_TOKEN_HEADER,
};
pub use password::{hash_password, verify_password};
pub use store::{AccountStats, AccountStore, UserStore};
pub use token::{Claims, TokenIssuer, TokenResponse, DEFAULT_TOKEN_TTL_SECS};
pub use user::{
    gravatar_url, normalize_email, LoginRequest, PublicUser, RegisterRequest, User, UserId,
    MIN_PASSWORD_LEN,
};
pub use validation::{non_blank, FieldError, FieldErrorCode};
