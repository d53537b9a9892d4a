//! User Service
//! Mission: Account lifecycle — register, read, change password, delete

use crate::auth::error::AuthError;
use crate::auth::gate::AuthorizationGate;
use crate::auth::models::{UserRecord, UserSummary};
use crate::auth::password::PasswordHasher;
use crate::auth::user_store::{CredentialStore, InsertError};
use std::sync::Arc;
use tracing::info;

/// Account operations over the credential store. A user record is owned by
/// its own identity, so mutations gate on the target user id.
pub struct UserService {
    store: Arc<CredentialStore>,
    hasher: PasswordHasher,
    gate: Arc<AuthorizationGate>,
}

impl UserService {
    pub fn new(
        store: Arc<CredentialStore>,
        hasher: PasswordHasher,
        gate: Arc<AuthorizationGate>,
    ) -> Self {
        Self {
            store,
            hasher,
            gate,
        }
    }

    /// Register a new identity. The existence pre-check is an optimization;
    /// the store's uniqueness constraint is what actually decides a
    /// concurrent duplicate.
    pub async fn register(
        &self,
        user_id: &str,
        credential: &str,
    ) -> Result<UserSummary, AuthError> {
        if user_id.is_empty() || credential.is_empty() {
            return Err(AuthError::InvalidInput(
                "user_id and credential must be non-empty".to_string(),
            ));
        }

        if self.store.exists(user_id).map_err(AuthError::store)? {
            return Err(AuthError::IdentityAlreadyExists);
        }

        let derived = self
            .hasher
            .derive_offloaded(credential.to_string(), None)
            .await?;

        let record = UserRecord::new(user_id, derived.derived_secret, derived.salt);

        match self.store.insert(&record) {
            Ok(()) => Ok(UserSummary::from_record(&record)),
            Err(InsertError::Duplicate) => Err(AuthError::IdentityAlreadyExists),
            Err(InsertError::Store(e)) => Err(AuthError::store(e)),
        }
    }

    /// Public read; never exposes credential material.
    pub fn get(&self, user_id: &str) -> Result<UserSummary, AuthError> {
        self.store
            .find_by_user_id(user_id)
            .map_err(AuthError::store)?
            .map(|record| UserSummary::from_record(&record))
            .ok_or(AuthError::IdentityNotFound)
    }

    pub fn list(&self) -> Result<Vec<UserSummary>, AuthError> {
        self.store.list().map_err(AuthError::store)
    }

    /// Re-derive the secret with a fresh random salt and replace both
    /// columns in one update. Previously issued tokens stay valid until
    /// their natural expiry.
    pub async fn change_password(
        &self,
        token: &str,
        user_id: &str,
        new_credential: &str,
    ) -> Result<(), AuthError> {
        if new_credential.is_empty() {
            return Err(AuthError::InvalidInput(
                "credential must be non-empty".to_string(),
            ));
        }

        self.gate.authorize(token, user_id)?;

        let derived = self
            .hasher
            .derive_offloaded(new_credential.to_string(), None)
            .await?;

        let matched = self
            .store
            .update_secret(user_id, &derived.derived_secret, &derived.salt)
            .map_err(AuthError::store)?;

        if matched == 0 {
            return Err(AuthError::IdentityNotFound);
        }

        info!("password changed: {}", user_id);
        Ok(())
    }

    /// Delete the account. Tokens already issued to it remain valid until
    /// expiry.
    pub fn delete(&self, token: &str, user_id: &str) -> Result<(), AuthError> {
        self.gate.authorize(token, user_id)?;

        let deleted = self.store.delete(user_id).map_err(AuthError::store)?;

        if deleted == 0 {
            return Err(AuthError::IdentityNotFound);
        }

        Ok(())
    }
}
