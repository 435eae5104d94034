//! Registration, login and current-user endpoints.
//!
//! | Method | Path         | Auth   | Response                 |
//! |--------|--------------|--------|--------------------------|
//! | POST   | `/api/users` | none   | `{token}`                |
//! | POST   | `/api/auth`  | none   | `{token}`                |
//! | GET    | `/api/auth`  | bearer | user without password    |

use axum::{extract::State, routing::get, routing::post, Json, Router};
use devlink_accounts::{LoginRequest, PublicUser, RegisterRequest, TokenResponse};

use crate::api::{ApiError, AppState};
use crate::extract::AuthUser;
use crate::validation::ValidJson;

/// Creates the account routes.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/auth", get(current_user).post(login))
}

/// Registers a user and returns a token for it.
async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let accounts = state.accounts.clone();

    // Password hashing is CPU-bound.
    let (_, token) = tokio::task::spawn_blocking(move || accounts.register(&req))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(TokenResponse { token }))
}

/// Exchanges credentials for a token.
async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let accounts = state.accounts.clone();

    let token = tokio::task::spawn_blocking(move || accounts.authenticate(&req))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(TokenResponse { token }))
}

/// Returns the authenticated user.
async fn current_user(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user)
}
