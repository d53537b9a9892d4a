//! Post Service
//! Mission: Ownership-gated CRUD over the post store

use crate::auth::error::AuthError;
use crate::auth::gate::AuthorizationGate;
use crate::posts::store::{Post, PostStore};
use std::sync::Arc;
use tracing::info;

/// Post operations. Reads are unauthenticated; creation stamps the author
/// from the verified token; update and delete pass through the
/// authorization gate against the recorded author.
pub struct PostService {
    store: Arc<PostStore>,
    gate: Arc<AuthorizationGate>,
}

impl PostService {
    pub fn new(store: Arc<PostStore>, gate: Arc<AuthorizationGate>) -> Self {
        Self { store, gate }
    }

    /// Create a post owned by the token's identity. No ownership comparison
    /// here — there is no pre-existing owner.
    pub fn create(&self, token: &str, title: &str, content: &str) -> Result<Post, AuthError> {
        let author = self.gate.resolve_identity(token)?;

        if title.is_empty() {
            return Err(AuthError::InvalidInput("title must be non-empty".to_string()));
        }

        let post = Post::new(title, content, &author);
        self.store.insert(&post).map_err(AuthError::store)?;

        info!("post created: {} by {}", post.id, author);
        Ok(post)
    }

    pub fn get(&self, id: &str) -> Result<Post, AuthError> {
        self.store
            .find(id)
            .map_err(AuthError::store)?
            .ok_or(AuthError::PostNotFound)
    }

    pub fn list(&self) -> Result<Vec<Post>, AuthError> {
        self.store.list().map_err(AuthError::store)
    }

    /// Update title/content. Only the recorded author passes the gate; the
    /// author field itself never changes.
    pub fn update(
        &self,
        token: &str,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Post, AuthError> {
        let post = self.get(id)?;
        self.gate.authorize(token, &post.author)?;

        if let Some(title) = title {
            if title.is_empty() {
                return Err(AuthError::InvalidInput("title must be non-empty".to_string()));
            }
        }

        self.store
            .update_fields(id, title, content)
            .map_err(AuthError::store)?;

        self.get(id)
    }

    pub fn delete(&self, token: &str, id: &str) -> Result<(), AuthError> {
        let post = self.get(id)?;
        self.gate.authorize(token, &post.author)?;

        self.store.delete(id).map_err(AuthError::store)?;

        info!("post deleted: {}", id);
        Ok(())
    }
}
