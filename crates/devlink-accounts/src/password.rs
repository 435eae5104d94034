//! One-way password hashing with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use std::sync::OnceLock;

use crate::error::{AccountError, Result};

#[cfg(test)]
thread_local! {
    /// Verifications run on the current thread.
    pub(crate) static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Hash a plaintext password with a fresh random salt.
///
/// Returns the PHC string (algorithm, parameters, salt and hash).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Crypto(e.to_string()))
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<()> {
    #[cfg(test)]
    VERIFICATIONS.with(|n| n.set(n.get() + 1));

    let parsed_hash = PasswordHash::new(hash).map_err(|e| AccountError::Crypto(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)
}

/// Run a full verification for a login whose email matched no account.
///
/// The work equals a wrong-password check against a real account. Always
/// returns [`AccountError::InvalidCredentials`].
pub fn reject_unknown_account(password: &str) -> AccountError {
    static PLACEHOLDER_HASH: OnceLock<Option<String>> = OnceLock::new();

    let hash = PLACEHOLDER_HASH.get_or_init(|| hash_password("devlink-placeholder-account").ok());
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
    AccountError::InvalidCredentials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("hunter22"));
        assert!(verify_password("hunter22", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let hash = hash_password("hunter22").unwrap();
        assert!(matches!(
            verify_password("hunter23", &hash),
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_is_crypto_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AccountError::Crypto(_))
        ));
    }

    #[test]
    fn test_reject_unknown_account_verifies() {
        let before = VERIFICATIONS.with(|n| n.get());
        let err = reject_unknown_account("whatever");
        assert!(matches!(err, AccountError::InvalidCredentials));
        assert_eq!(VERIFICATIONS.with(|n| n.get()), before + 1);

        // The placeholder password itself is still rejected.
        assert!(matches!(
            reject_unknown_account("devlink-placeholder-account"),
            AccountError::InvalidCredentials
        ));
    }
}
