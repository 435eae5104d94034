//! Field-level validation errors shared by every request type.

use serde::{Deserialize, Serialize};

/// Where a validated value came from. Request bodies are the only source.
const BODY_LOCATION: &str = "body";

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Human-readable message.
    pub msg: String,
    /// Name of the offending field.
    pub param: String,
    /// Machine-readable reason.
    pub code: FieldErrorCode,
    /// Request part the field was read from.
    pub location: String,
}

impl FieldError {
    /// Create a new field error on a body parameter.
    pub fn new(param: impl Into<String>, code: FieldErrorCode, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: param.into(),
            code,
            location: BODY_LOCATION.to_string(),
        }
    }

    /// Shorthand for a missing required field.
    pub fn missing(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(param, FieldErrorCode::Missing, msg)
    }
}

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// Field is missing or blank.
    Missing,
    /// Field value is malformed.
    Invalid,
    /// Value is too short (weak password).
    TooShort,
    /// Resource already exists.
    AlreadyExists,
}

/// Returns the trimmed value if it is present and not blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
