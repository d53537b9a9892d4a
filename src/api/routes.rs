//! Router Assembly
//! Mission: Wire the HTTP surface to the core services

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{api as auth_api, Authenticator, UserService};
use crate::posts::{api as post_api, PostService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
}

/// Create the API router.
///
/// Reads are public; mutating routes carry a bearer token which each
/// handler resolves through the authorization gate.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/authentications", post(auth_api::login))
        .route("/users", post(auth_api::register).get(auth_api::list_users))
        .route(
            "/users/:user_id",
            get(auth_api::get_user)
                .put(auth_api::change_password)
                .delete(auth_api::delete_user),
        )
        .route(
            "/posts",
            post(post_api::create_post).get(post_api::list_posts),
        )
        .route(
            "/posts/:id",
            get(post_api::get_post)
                .put(post_api::update_post)
                .delete(post_api::delete_post),
        )
        .with_state(state)
}

/// Health check endpoint
async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        msg: "server status good",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct StatusResponse {
    msg: &'static str,
    version: &'static str,
}
