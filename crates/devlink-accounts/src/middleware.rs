//! Bearer token extraction from request headers.
//!
//! Two carriers are accepted:
//!
//! ```text
//! x-auth-token: <jwt>
//! Authorization: Bearer <jwt>
//! ```

/// Header used by the single-page client.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authorization header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationValue {
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// Raw token from the `x-auth-token` header.
    Raw(String),
}

impl AuthorizationValue {
    /// Get the token string regardless of carrier.
    pub fn token(&self) -> &str {
        match self {
            Self::Bearer(t) | Self::Raw(t) => t,
        }
    }
}

/// Parse an `Authorization` header. Only the Bearer scheme is supported.
pub fn parse_authorization_header(header: &str) -> Option<AuthorizationValue> {
    let header = header.trim();

    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(AuthorizationValue::Bearer(token.to_string()))
}

/// Pick the presented token, preferring `x-auth-token` when both are sent.
///
/// Returns `None` when no usable token is present on either header.
pub fn token_from_headers(
    auth_token: Option<&str>,
    authorization: Option<&str>,
) -> Option<AuthorizationValue> {
    if let Some(raw) = auth_token.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(AuthorizationValue::Raw(raw.to_string()));
    }

    authorization.and_then(parse_authorization_header)
}
