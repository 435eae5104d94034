//! Authenticated caller extraction.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use devlink_accounts::{token_from_headers, AccountError, PublicUser, AUTH_TOKEN_HEADER};
use devlink_social::AuthorSnapshot;

use crate::api::{ApiError, AppState};

/// The user a valid bearer token belongs to.
///
/// Rejects with 401 when the token is missing, invalid or expired, or when
/// its user has since been deleted.
#[derive(Debug, Clone)]
pub struct AuthUser(pub PublicUser);

impl AuthUser {
    /// Author data to stamp on a new post or comment.
    pub fn snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot::new(self.0.id, &self.0.name, &self.0.avatar_url)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_token = parts
            .headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let presented =
            token_from_headers(auth_token, authorization).ok_or(AccountError::MissingToken)?;
        let user_id = state.accounts.verify_token(presented.token())?;

        let user = state.accounts.load_current_user(user_id).map_err(|_| {
            tracing::debug!(%user_id, "Token presented for deleted user");
            AccountError::InvalidToken("user no longer exists".into())
        })?;

        Ok(AuthUser(user))
    }
}
