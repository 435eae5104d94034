//! # Input Validation Module
//!
//! Request-shape checks that run before any handler logic:
//!
//! - JSON bodies that fail to parse become `400 {errors: [...]}`
//! - Path IDs that are not UUIDs are reported as "not found"
//!
//! Field-level rules live with the request types in the store crates.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use devlink_accounts::{FieldError, FieldErrorCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::ApiError;

/// JSON body extractor whose rejections use the API's error shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_rejection(rejection)),
        }
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");

    let msg = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Request body must be JSON".to_string(),
        other => other.body_text(),
    };
    ApiError::Validation(vec![FieldError::new("body", FieldErrorCode::Invalid, msg)])
}

/// Parse a path ID. Malformed IDs yield `None` and are treated as unknown.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
