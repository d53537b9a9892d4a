//! Credential Storage
//! Mission: Persist identity records with SQLite

use crate::auth::models::{UserRecord, UserSummary};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::info;

/// Outcome of an insert that hit the uniqueness constraint versus a real
/// store failure. The constraint is the authoritative duplicate guard;
/// existence pre-checks upstream are an optimization only.
#[derive(Debug)]
pub enum InsertError {
    Duplicate,
    Store(anyhow::Error),
}

/// Identity record storage with SQLite backend.
pub struct CredentialStore {
    db_path: String,
}

impl CredentialStore {
    /// Create a new store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                derived_secret TEXT NOT NULL,
                salt TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Get the full identity record, credential material included.
    pub fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT user_id, derived_secret, salt, created_at
             FROM users WHERE user_id = ?1",
        )?;

        let record = stmt.query_row(params![user_id], |row| {
            Ok(UserRecord {
                user_id: row.get(0)?,
                derived_secret: row.get(1)?,
                salt: row.get(2)?,
                created_at: row.get(3)?,
            })
        });

        match record {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, user_id: &str) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .context("Failed to check user existence")?;

        Ok(count > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = Connection::open(&self.db_path)?;

        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .context("Failed to count users")
    }

    /// Insert a new identity record. The PRIMARY KEY constraint decides
    /// duplicates, not the caller's pre-check.
    pub fn insert(&self, record: &UserRecord) -> Result<(), InsertError> {
        let conn = Connection::open(&self.db_path).map_err(|e| InsertError::Store(e.into()))?;

        let result = conn.execute(
            "INSERT INTO users (user_id, derived_secret, salt, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.user_id,
                record.derived_secret,
                record.salt,
                record.created_at,
            ],
        );

        match result {
            Ok(_) => {
                info!("created user: {}", record.user_id);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(InsertError::Duplicate)
            }
            Err(e) => Err(InsertError::Store(e.into())),
        }
    }

    /// Replace the derived secret and its salt together, atomically.
    /// Returns the number of matched rows.
    pub fn update_secret(
        &self,
        user_id: &str,
        derived_secret: &str,
        salt: &str,
    ) -> Result<usize> {
        let conn = Connection::open(&self.db_path)?;

        let matched = conn
            .execute(
                "UPDATE users SET derived_secret = ?2, salt = ?3 WHERE user_id = ?1",
                params![user_id, derived_secret, salt],
            )
            .context("Failed to update credential")?;

        Ok(matched)
    }

    /// Delete an identity record. Returns the number of deleted rows.
    pub fn delete(&self, user_id: &str) -> Result<usize> {
        let conn = Connection::open(&self.db_path)?;

        let deleted = conn
            .execute("DELETE FROM users WHERE user_id = ?1", params![user_id])
            .context("Failed to delete user")?;

        if deleted > 0 {
            info!("deleted user: {}", user_id);
        }

        Ok(deleted)
    }

    /// Public listing, no credential material.
    pub fn list(&self) -> Result<Vec<UserSummary>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt =
            conn.prepare("SELECT user_id, created_at FROM users ORDER BY created_at")?;

        let users = stmt
            .query_map([], |row| {
                Ok(UserSummary {
                    user_id: row.get(0)?,
                    created_at: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
