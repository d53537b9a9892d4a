//! Authorization Gate
//! Mission: Decide allow/deny for mutating operations on owned resources

use crate::auth::error::AuthError;
use crate::auth::jwt::TokenService;
use std::sync::Arc;

/// Ownership gate over verified tokens. Applied to every update and delete
/// on an owned resource; reads bypass it entirely, and creation uses
/// `resolve_identity` since there is no pre-existing owner to compare.
pub struct AuthorizationGate {
    tokens: Arc<TokenService>,
}

impl AuthorizationGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Verify the token, then require the bound identity to match the
    /// recorded owner. Returns the caller's identity so the caller can
    /// proceed with its own mutation.
    ///
    /// The ownership comparison is ordinary equality: it checks an
    /// authorization fact about non-secret values, not a credential.
    pub fn authorize(&self, token: &str, resource_owner: &str) -> Result<String, AuthError> {
        let user_id = self.tokens.verify(token)?;

        if user_id != resource_owner {
            return Err(AuthError::Forbidden);
        }

        Ok(user_id)
    }

    /// Verify the token and return the bound identity without any
    /// ownership comparison — the resource-creation path, which stamps the
    /// owner field from this result.
    pub fn resolve_identity(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token)
    }
}
