//! HTTP API for the Devlink node.
//!
//! Shared state, error translation and the top-level router.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use devlink_accounts::{AccountError, AccountStore, FieldError, TokenIssuer};
use devlink_social::{SocialError, SocialStore};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::observability::request_id_layer;
use crate::persistence::{persist_after_write, Persistence, PersistenceError};
use crate::resilience::RetryPolicy;
use crate::{account_api, post_api, profile_api};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Users and tokens.
    pub accounts: Arc<AccountStore>,
    /// Profiles and posts.
    pub social: Arc<SocialStore>,
    /// Snapshot file, when persistence is enabled.
    pub persistence: Option<Arc<Persistence>>,
    /// Retry policy for the cascading account delete.
    pub retry: RetryPolicy,
}

impl AppState {
    /// Create in-memory state with no persistence.
    pub fn new(tokens: TokenIssuer) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(tokens)),
            social: Arc::new(SocialStore::new()),
            persistence: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Enable snapshot persistence.
    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = Some(Arc::new(persistence));
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Load the snapshot into the stores, if persistence is enabled.
    ///
    /// Returns true if a snapshot file was found.
    pub fn load_snapshot(&self) -> Result<bool, PersistenceError> {
        match &self.persistence {
            Some(persistence) => persistence.load(&self.accounts, &self.social),
            None => Ok(false),
        }
    }

    /// Write the snapshot, if persistence is enabled.
    pub async fn flush(&self) -> Result<(), ApiError> {
        let Some(persistence) = self.persistence.clone() else {
            return Ok(());
        };
        let accounts = Arc::clone(&self.accounts);
        let social = Arc::clone(&self.social);

        tokio::task::spawn_blocking(move || persistence.save(&accounts, &social))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;
        Ok(())
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Social(#[from] SocialError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    /// Request body is not acceptable.
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),
    /// Lookup failed before reaching a store, e.g. a malformed ID.
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            ApiError::Account(e) => e.status_code(),
            ApiError::Social(e) => e.status_code(),
            ApiError::Persistence(_) | ApiError::Internal(_) => 500,
            ApiError::Validation(_) | ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            return (status, Json(MessageResponse::new("Server Error"))).into_response();
        }

        if let ApiError::Account(e) = &self {
            if e.is_unauthenticated() {
                tracing::debug!(error = %e, "Rejected unauthenticated request");
            }
        }

        let errors = match &self {
            ApiError::Account(e) => e.field_errors(),
            ApiError::Social(e) => e.field_errors().map(<[FieldError]>::to_vec),
            ApiError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };
        if let Some(errors) = errors {
            return (status, Json(ErrorsResponse { errors })).into_response();
        }

        let msg = match &self {
            ApiError::Account(e) => e.public_message(),
            ApiError::Social(e) => e.public_message(),
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => *msg,
            _ => "Server Error",
        };
        (status, Json(MessageResponse::new(msg))).into_response()
    }
}

/// `{msg}` response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// `{errors: [...]}` response body.
#[derive(Debug, Serialize)]
struct ErrorsResponse {
    errors: Vec<FieldError>,
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(account_api::account_routes())
        .merge(profile_api::profile_routes())
        .merge(post_api::post_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            persist_after_write,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
