//! Post Storage
//! Mission: Persist posts and their ownership link with SQLite

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post. `author` is stamped from the verified caller at creation time
/// and never reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

impl Post {
    pub fn new(title: &str, content: &str, author: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Post storage with SQLite backend.
pub struct PostStore {
    db_path: String,
}

impl PostStore {
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
            "CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                author TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn insert(&self, post: &Post) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO posts (id, title, content, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                post.id,
                post.title,
                post.content,
                post.author,
                post.created_at,
            ],
        )
        .context("Failed to insert post")?;

        Ok(())
    }

    pub fn find(&self, id: &str) -> Result<Option<Post>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, title, content, author, created_at FROM posts WHERE id = ?1",
        )?;

        let post = stmt.query_row(params![id], |row| {
            Ok(Post {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                author: row.get(3)?,
                created_at: row.get(4)?,
            })
        });

        match post {
            Ok(post) => Ok(Some(post)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(&self) -> Result<Vec<Post>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, title, content, author, created_at FROM posts ORDER BY created_at",
        )?;

        let posts = stmt
            .query_map([], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    author: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Update title and/or content. The author column is never touched.
    /// Returns the number of matched rows.
    pub fn update_fields(
        &self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<usize> {
        let conn = Connection::open(&self.db_path)?;

        let matched = conn
            .execute(
                "UPDATE posts
                 SET title = COALESCE(?2, title), content = COALESCE(?3, content)
                 WHERE id = ?1",
                params![id, title, content],
            )
            .context("Failed to update post")?;

        Ok(matched)
    }

    /// Returns the number of deleted rows.
    pub fn delete(&self, id: &str) -> Result<usize> {
        let conn = Connection::open(&self.db_path)?;

        let deleted = conn
            .execute("DELETE FROM posts WHERE id = ?1", params![id])
            .context("Failed to delete post")?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (PostStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = PostStore::new(temp_file.path().to_str().unwrap()).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_insert_and_find_roundtrip() {
        let (store, _temp) = create_test_store();

        let post = Post::new("hello", "first post", "asdf");
        store.insert(&post).unwrap();

        let found = store.find(&post.id).unwrap().unwrap();
        assert_eq!(found.title, "hello");
        assert_eq!(found.content, "first post");
        assert_eq!(found.author, "asdf");
    }

    #[test]
    fn test_find_missing_returns_none() {
        let (store, _temp) = create_test_store();

        assert!(store.find("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_update_fields_partial() {
        let (store, _temp) = create_test_store();

        let post = Post::new("hello", "body", "asdf");
        store.insert(&post).unwrap();

        let matched = store.update_fields(&post.id, Some("revised"), None).unwrap();
        assert_eq!(matched, 1);

        let found = store.find(&post.id).unwrap().unwrap();
        assert_eq!(found.title, "revised");
        assert_eq!(found.content, "body");
        assert_eq!(found.author, "asdf");
    }

    #[test]
    fn test_update_missing_matches_zero() {
        let (store, _temp) = create_test_store();

        assert_eq!(store.update_fields("ghost", Some("t"), None).unwrap(), 0);
    }

    #[test]
    fn test_delete_counts() {
        let (store, _temp) = create_test_store();

        let post = Post::new("hello", "", "asdf");
        store.insert(&post).unwrap();

        assert_eq!(store.delete(&post.id).unwrap(), 1);
        assert_eq!(store.delete(&post.id).unwrap(), 0);
    }

    #[test]
    fn test_list_orders_by_creation() {
        let (store, _temp) = create_test_store();

        let mut first = Post::new("a", "", "asdf");
        first.created_at = "2024-01-01T00:00:00Z".to_string();
        let mut second = Post::new("b", "", "asdf");
        second.created_at = "2024-06-01T00:00:00Z".to_string();

        store.insert(&second).unwrap();
        store.insert(&first).unwrap();

        let posts = store.list().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "a");
        assert_eq!(posts[1].title, "b");
    }
}
