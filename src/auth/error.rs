//! Auth Error Taxonomy
//! Mission: One tagged error type for every outcome the core can produce

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Every error the auth core and the resource services can surface.
///
/// Client-fault kinds (4xx) return their message as-is; server-fault kinds
/// (5xx) are logged and collapsed into a generic body.
#[derive(Debug)]
pub enum AuthError {
    /// Malformed request shape (empty identity, empty credential, ...)
    InvalidInput(String),
    /// No identity record for the requested user
    IdentityNotFound,
    /// Registration target already exists
    IdentityAlreadyExists,
    /// Credential did not match the stored derived secret
    AuthenticationFailed,
    /// Missing or malformed Authorization header
    Unauthenticated,
    /// Token signature valid but past its expiry
    TokenExpired,
    /// Token malformed or signature mismatch
    TokenInvalid,
    /// Valid token, wrong resource owner
    Forbidden,
    /// No post with the requested id
    PostNotFound,
    /// Key-derivation primitive failed
    HashFailure(String),
    /// Token signing primitive failed
    SigningFailure(String),
    /// Unexpected failure inside token verification
    VerificationError(String),
    /// Persistence layer failure
    StoreError(String),
}

impl AuthError {
    /// Wrap a persistence-layer error.
    pub fn store(err: anyhow::Error) -> Self {
        AuthError::StoreError(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::IdentityNotFound | AuthError::PostNotFound => StatusCode::NOT_FOUND,
            AuthError::IdentityAlreadyExists => StatusCode::CONFLICT,
            AuthError::AuthenticationFailed
            | AuthError::Unauthenticated
            | AuthError::TokenExpired
            | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::HashFailure(_)
            | AuthError::SigningFailure(_)
            | AuthError::VerificationError(_)
            | AuthError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AuthError::IdentityNotFound => write!(f, "User not found"),
            AuthError::IdentityAlreadyExists => write!(f, "User already exists"),
            AuthError::AuthenticationFailed => write!(f, "Failed to authenticate"),
            AuthError::Unauthenticated => write!(f, "Missing or malformed authorization token"),
            AuthError::TokenExpired => write!(f, "Token expired"),
            AuthError::TokenInvalid => write!(f, "Invalid token"),
            AuthError::Forbidden => write!(f, "Not the owner of this resource"),
            AuthError::PostNotFound => write!(f, "Post not found"),
            AuthError::HashFailure(msg) => write!(f, "Key derivation failed: {}", msg),
            AuthError::SigningFailure(msg) => write!(f, "Token signing failed: {}", msg),
            AuthError::VerificationError(msg) => {
                write!(f, "Token verification failed: {}", msg)
            }
            AuthError::StoreError(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!("server-fault auth error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::IdentityNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::IdentityAlreadyExists.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::AuthenticationFailed.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::StoreError("db".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::HashFailure("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_faults_hide_details() {
        let resp = AuthError::StoreError("connection refused".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AuthError::Forbidden.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_token_errors_are_distinguishable() {
        // Same status class, different user-facing messages
        assert_ne!(
            AuthError::TokenExpired.to_string(),
            AuthError::TokenInvalid.to_string()
        );
    }
}
