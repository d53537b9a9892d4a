//! Authentication Middleware
//! Mission: Pull bearer tokens out of incoming requests

use crate::auth::error::AuthError;
use axum::http::{header, HeaderMap};

/// Extract the bearer token from the `Authorization` header.
///
/// The header value must be exactly `Bearer <token>`; a missing header,
/// non-UTF8 value, or any other scheme is `Unauthenticated`. Verification
/// happens later, at the gate.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Unauthenticated)?
        .to_str()
        .map_err(|_| AuthError::Unauthenticated)?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Unauthenticated)
}
