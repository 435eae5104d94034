//! Credential store and auth service.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AccountError, Result};
use crate::password::{hash_password, reject_unknown_account, verify_password};
use crate::token::TokenIssuer;
use crate::user::{LoginRequest, PublicUser, RegisterRequest, User, UserId};

/// Account data store plus the token issuer that authenticates against it.
#[derive(Debug, Clone)]
pub struct AccountStore {
    /// User storage.
    pub users: UserStore,
    /// Bearer token issuer.
    pub tokens: TokenIssuer,
}

impl AccountStore {
    /// Create an account store around a token issuer.
    pub fn new(tokens: TokenIssuer) -> Self {
        Self {
            users: UserStore::new(),
            tokens,
        }
    }

    /// Register a new user and issue a token bound to it.
    pub fn register(&self, req: &RegisterRequest) -> Result<(PublicUser, String)> {
        let (name, email, password) = req.validate()?;

        // Fail fast before paying for the hash; `create` re-checks under the lock.
        if self.users.get_by_email(&email).is_some() {
            return Err(AccountError::EmailExists(email));
        }

        let password_hash = hash_password(&password)?;
        let user = self.users.create(name, email, password_hash)?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok((user.to_public(), token))
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password both return
    /// [`AccountError::InvalidCredentials`].
    pub fn authenticate(&self, req: &LoginRequest) -> Result<String> {
        let (email, password) = req.validate()?;

        // Unknown emails still pay for one full verification.
        let Some(user) = self.users.get_by_email(&email) else {
            return Err(reject_unknown_account(&password));
        };

        verify_password(&password, &user.password_hash)?;

        tracing::debug!(user_id = %user.id, "User authenticated");
        self.tokens.issue(user.id)
    }

    /// Verify a bearer token and return the user ID it asserts.
    pub fn verify_token(&self, token: &str) -> Result<UserId> {
        self.tokens.verify(token)
    }

    /// Load the user behind a verified token, without the password hash.
    pub fn load_current_user(&self, user_id: UserId) -> Result<PublicUser> {
        self.users
            .get(user_id)
            .map(|u| u.to_public())
            .ok_or(AccountError::UserNotFound(user_id))
    }

    /// Get statistics about stored data.
    pub fn stats(&self) -> AccountStats {
        AccountStats {
            users: self.users.count(),
        }
    }
}

/// User storage.
///
/// Users and the email index live behind one lock so lookups never observe
/// one map updated without the other.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    table: Arc<RwLock<UserTable>>,
}

#[derive(Debug, Default)]
struct UserTable {
    /// Users by ID.
    by_id: HashMap<UserId, User>,
    /// Normalized email to ID index.
    by_email: HashMap<String, UserId>,
}

impl UserStore {
    /// Create a new user store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new user. `email` must already be normalized.
    pub fn create(&self, name: String, email: String, password_hash: String) -> Result<User> {
        let mut table = self.table.write();

        if table.by_email.contains_key(&email) {
            return Err(AccountError::EmailExists(email));
        }

        let user = User::new(name, email, password_hash);
        table.by_email.insert(user.email.clone(), user.id);
        table.by_id.insert(user.id, user.clone());

        Ok(user)
    }

    /// Get a user by ID.
    pub fn get(&self, id: UserId) -> Option<User> {
        self.table.read().by_id.get(&id).cloned()
    }

    /// Get a user by normalized email.
    pub fn get_by_email(&self, email: &str) -> Option<User> {
        let table = self.table.read();
        let id = table.by_email.get(email)?;
        table.by_id.get(id).cloned()
    }

    /// Delete a user. Returns the removed user, or `None` if already gone.
    pub fn delete(&self, id: UserId) -> Option<User> {
        let mut table = self.table.write();

        let user = table.by_id.remove(&id)?;
        table.by_email.remove(&user.email);
        Some(user)
    }

    /// List all users.
    pub fn list(&self) -> Vec<User> {
        self.table.read().by_id.values().cloned().collect()
    }

    /// Replace the whole collection, rebuilding the email index.
    pub fn restore(&self, users: Vec<User>) -> Result<()> {
        let mut restored = UserTable {
            by_id: HashMap::with_capacity(users.len()),
            by_email: HashMap::with_capacity(users.len()),
        };

        for user in users {
            if restored
                .by_email
                .insert(user.email.clone(), user.id)
                .is_some()
            {
                return Err(AccountError::Storage(format!(
                    "duplicate email in snapshot: {}",
                    user.email
                )));
            }
            restored.by_id.insert(user.id, user);
        }

        *self.table.write() = restored;
        Ok(())
    }

    /// Count users.
    pub fn count(&self) -> usize {
        self.table.read().by_id.len()
    }
}

/// Statistics about stored data.
#[derive(Debug, Clone, Serialize)]
pub struct AccountStats {
    /// Number of users.
    pub users: usize,
}
