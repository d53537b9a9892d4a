//! Authentication API Endpoints
//! Mission: Login and account endpoints over the auth core

use crate::api::routes::AppState;
use crate::auth::error::AuthError;
use crate::auth::middleware::bearer_token;
use crate::auth::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UserSummary,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};

/// Login endpoint - POST /authentications
///
/// 201 on success: a new session token is a created resource.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AuthError> {
    let token = state
        .authenticator
        .authenticate(&payload.user_id, &payload.credential)
        .await?;

    Ok((StatusCode::CREATED, Json(LoginResponse { token })))
}

/// Register endpoint - POST /users
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AuthError> {
    let summary = state
        .users
        .register(&payload.user_id, &payload.credential)
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// List users - GET /users (public, no credential material)
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, AuthError> {
    let users = state.users.list()?;

    Ok(Json(json!({ "users": users })))
}

/// Get one user - GET /users/:user_id (public)
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AuthError> {
    let user = state.users.get(&user_id)?;

    Ok(Json(json!({ "user": user })))
}

/// Change password - PUT /users/:user_id (owner only)
pub async fn change_password(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AuthError> {
    let token = bearer_token(&headers)?;

    state
        .users
        .change_password(token, &user_id, &payload.credential)
        .await?;

    Ok(Json(json!({ "msg": format!("User {} updated", user_id) })))
}

/// Delete account - DELETE /users/:user_id (owner only)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, AuthError> {
    let token = bearer_token(&headers)?;

    state.users.delete(token, &user_id)?;

    Ok(Json(json!({ "msg": format!("User {} deleted", user_id) })))
}
