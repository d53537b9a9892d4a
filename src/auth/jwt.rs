//! Token Service
//! Mission: Issue and verify signed, time-limited bearer tokens

use crate::auth::error::AuthError;
use crate::auth::models::Claims;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

/// Default token lifetime: one hour.
const DEFAULT_TTL_SECS: i64 = 3600;

/// Stateless token issuer/verifier. HS512 with a process-wide secret; a
/// token's validity is a pure function of (current time, token bytes,
/// secret) — nothing is persisted and nothing can be revoked.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, DEFAULT_TTL_SECS)
    }

    /// Negative lifetimes are accepted so expiry handling can be exercised
    /// without sleeping.
    pub fn with_ttl(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Sign a token binding `user_id`, expiring `ttl_secs` from now.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.ttl_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        debug!("issuing token for {}, ttl {}s", user_id, self.ttl_secs);

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))
    }

    /// Verify signature and expiry; return the bound identity.
    ///
    /// Expired, malformed, and internally-failed verifications are
    /// distinguishable so callers can answer differently for each.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::ImmatureSignature
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::TokenInvalid,
                _ => AuthError::VerificationError(e.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new("test-secret-key-12345");

        let token = service.issue("asdf").unwrap();
        assert!(!token.is_empty());

        let user_id = service.verify(&token).unwrap();
        assert_eq!(user_id, "asdf");
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::with_ttl("test-secret-key-12345", -5);

        let token = service.issue("asdf").unwrap();
        let err = service.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new("test-secret-key-12345");

        let err = service.verify("not.a.token").unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = TokenService::new("test-secret-key-12345");

        let token = service.issue("asdf").unwrap();
        let mut tampered = token.clone();
        // Flip a character in the signature segment
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let err = service.verify(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer = TokenService::new("secret-one");
        let verifier = TokenService::new("secret-two");

        let token = issuer.issue("asdf").unwrap();
        let err = verifier.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_claims_carry_issuance_window() {
        let service = TokenService::new("test-secret-key-12345");
        let before = Utc::now().timestamp();
        let token = service.issue("asdf").unwrap();

        // Decode without the service to inspect raw claims
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret-key-12345"),
            &validation,
        )
        .unwrap();

        assert!(data.claims.iat >= before);
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }
}
