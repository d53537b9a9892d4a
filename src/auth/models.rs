//! Authentication Models
//! Mission: Define the identity record and auth wire types

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A persisted identity record. The derived secret and salt never leave the
/// credential store except into the password hasher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub derived_secret: String, // PBKDF2 output - never serialize
    #[serde(skip_serializing)]
    pub salt: String,
    pub created_at: String,
}

impl UserRecord {
    pub fn new(user_id: &str, derived_secret: String, salt: String) -> Self {
        Self {
            user_id: user_id.to_string(),
            derived_secret,
            salt,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Public view of a user (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: String,
    pub created_at: String,
}

impl UserSummary {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            created_at: record.created_at.clone(),
        }
    }
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user_id)
    pub iat: i64,    // issued-at timestamp
    pub exp: i64,    // expiration timestamp
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub credential: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub credential: String,
}

/// Password change request body
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub credential: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_and_salt_never_serialize() {
        let record = UserRecord::new("asdf", "deadbeef".to_string(), "cafe".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("cafe"));
        assert!(json.contains("asdf"));
    }

    #[test]
    fn test_summary_from_record() {
        let record = UserRecord::new("asdf", "secret".to_string(), "salt".to_string());
        let summary = UserSummary::from_record(&record);
        assert_eq!(summary.user_id, "asdf");
        assert_eq!(summary.created_at, record.created_at);
    }
}
