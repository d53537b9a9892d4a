//! Post API Endpoints
//! Mission: Post CRUD with ownership enforcement at the gate

use crate::api::routes::AppState;
use crate::auth::error::AuthError;
use crate::auth::middleware::bearer_token;
use crate::posts::store::Post;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Create post - POST /posts (bearer)
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AuthError> {
    let token = bearer_token(&headers)?;

    let post = state.posts.create(token, &payload.title, &payload.content)?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// List posts - GET /posts (public)
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Value>, AuthError> {
    let posts = state.posts.list()?;

    Ok(Json(json!({ "posts": posts })))
}

/// Get one post - GET /posts/:id (public)
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AuthError> {
    let post = state.posts.get(&id)?;

    Ok(Json(json!({ "post": post })))
}

/// Update post - PUT /posts/:id (owner only)
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AuthError> {
    let token = bearer_token(&headers)?;

    let post = state.posts.update(
        token,
        &id,
        payload.title.as_deref(),
        payload.content.as_deref(),
    )?;

    Ok(Json(post))
}

/// Delete post - DELETE /posts/:id (owner only)
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AuthError> {
    let token = bearer_token(&headers)?;

    state.posts.delete(token, &id)?;

    Ok(Json(json!({ "msg": format!("Post {} deleted", id) })))
}
