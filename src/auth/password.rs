//! Password Hasher
//! Mission: Derive verifiable secrets from plaintext credentials, slowly

use crate::auth::error::AuthError;
use hmac::Hmac;
use rand::RngCore;
use sha2::{Sha256, Sha512};

/// Salt byte length before hex encoding (16 bytes = 32 hex chars).
const SALT_BYTES: usize = 16;

/// Derived key byte length before hex encoding.
const KEY_BYTES: usize = 32;

/// Digest underlying the PBKDF2 PRF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfDigest {
    Sha256,
    Sha512,
}

/// Output of a derivation: the salt that keyed it and the derived secret,
/// both lowercase hex. The stored encoding must never change between
/// registration and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCredential {
    pub salt: String,
    pub derived_secret: String,
}

/// PBKDF2-based credential hasher.
///
/// Derivation is deliberately expensive; async callers must go through the
/// `*_offloaded` wrappers so one derivation cannot stall the runtime.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
    digest: KdfDigest,
}

impl PasswordHasher {
    /// Iteration count matching the original deployment.
    pub const DEFAULT_ITERATIONS: u32 = 310_000;

    pub fn new() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            digest: KdfDigest::Sha512,
        }
    }

    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations,
            digest: KdfDigest::Sha512,
        }
    }

    pub fn with_digest(mut self, digest: KdfDigest) -> Self {
        self.digest = digest;
        self
    }

    /// Derive a secret from a credential. A fresh random salt is generated
    /// when none is supplied; otherwise the stored salt string is used
    /// byte-for-byte.
    pub fn derive(
        &self,
        credential: &str,
        salt: Option<&str>,
    ) -> Result<DerivedCredential, AuthError> {
        let salt = match salt {
            Some(s) => s.to_string(),
            None => generate_salt(),
        };

        let mut key = [0u8; KEY_BYTES];
        let result = match self.digest {
            KdfDigest::Sha512 => pbkdf2::pbkdf2::<Hmac<Sha512>>(
                credential.as_bytes(),
                salt.as_bytes(),
                self.iterations,
                &mut key,
            ),
            KdfDigest::Sha256 => pbkdf2::pbkdf2::<Hmac<Sha256>>(
                credential.as_bytes(),
                salt.as_bytes(),
                self.iterations,
                &mut key,
            ),
        };
        result.map_err(|e| AuthError::HashFailure(e.to_string()))?;

        Ok(DerivedCredential {
            salt,
            derived_secret: hex::encode(key),
        })
    }

    /// Derive with the stored salt and compare against the stored secret in
    /// constant time. A derivation failure surfaces as an error, never as a
    /// false "no match".
    pub fn verify(
        &self,
        credential: &str,
        salt: &str,
        stored_secret: &str,
    ) -> Result<bool, AuthError> {
        let candidate = self.derive(credential, Some(salt))?;
        Ok(constant_time_eq(
            candidate.derived_secret.as_bytes(),
            stored_secret.as_bytes(),
        ))
    }

    /// `derive` on the blocking pool.
    pub async fn derive_offloaded(
        &self,
        credential: String,
        salt: Option<String>,
    ) -> Result<DerivedCredential, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.derive(&credential, salt.as_deref()))
            .await
            .map_err(|e| AuthError::HashFailure(e.to_string()))?
    }

    /// `verify` on the blocking pool.
    pub async fn verify_offloaded(
        &self,
        credential: String,
        salt: String,
        stored_secret: String,
    ) -> Result<bool, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&credential, &salt, &stored_secret))
            .await
            .map_err(|e| AuthError::HashFailure(e.to_string()))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a random salt (hex-encoded).
fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// Length mismatch returns false up front (length is not secret); equal
/// lengths are compared via an XOR accumulator so the running time does not
/// depend on the position of the first differing byte.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
