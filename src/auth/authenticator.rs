//! Authenticator
//! Mission: Turn (identity, credential) into a bearer token, or a precise refusal

use crate::auth::error::AuthError;
use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::auth::user_store::CredentialStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Login orchestration: store lookup, slow derivation with the stored salt,
/// constant-time comparison, token issuance. Never mutates the identity
/// record.
pub struct Authenticator {
    store: Arc<CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    pub fn new(
        store: Arc<CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Authenticate and issue a token.
    ///
    /// Failure kinds are distinct: empty arguments are `InvalidInput`, an
    /// unknown identity is `IdentityNotFound`, a credential mismatch is
    /// `AuthenticationFailed`. Store, hashing, and signing failures surface
    /// as their own server-fault kinds — never as a silent success.
    pub async fn authenticate(
        &self,
        user_id: &str,
        credential: &str,
    ) -> Result<String, AuthError> {
        if user_id.is_empty() || credential.is_empty() {
            return Err(AuthError::InvalidInput(
                "user_id and credential must be non-empty".to_string(),
            ));
        }

        let record = self
            .store
            .find_by_user_id(user_id)
            .map_err(AuthError::store)?
            .ok_or(AuthError::IdentityNotFound)?;

        let valid = self
            .hasher
            .verify_offloaded(
                credential.to_string(),
                record.salt,
                record.derived_secret,
            )
            .await?;

        if !valid {
            warn!("failed login attempt: {}", user_id);
            return Err(AuthError::AuthenticationFailed);
        }

        let token = self.tokens.issue(user_id)?;
        info!("login successful: {}", user_id);

        Ok(token)
    }

    /// Issue a token without a credential check — used right after a
    /// successful registration, where the caller just proved the credential
    /// by setting it.
    pub fn issue_token_for_new_identity(&self, user_id: &str) -> Result<String, AuthError> {
        self.tokens.issue(user_id)
    }
}
