//! Postboard - user accounts, token authentication, and posts over SQLite

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postboard_backend::{
    api::routes::{create_router, AppState},
    auth::{
        Authenticator, AuthorizationGate, CredentialStore, PasswordHasher, TokenService,
        UserService,
    },
    models::Config,
    posts::{PostService, PostStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    let _ = dotenv();
    init_tracing();

    let config = Config::from_env()?;

    let credential_store = Arc::new(
        CredentialStore::new(&config.database_path).context("Failed to open credential store")?,
    );
    let post_store =
        Arc::new(PostStore::new(&config.database_path).context("Failed to open post store")?);

    let hasher = PasswordHasher::with_iterations(config.kdf_iterations);
    let tokens = Arc::new(TokenService::with_ttl(
        &config.jwt_secret,
        config.token_ttl_secs,
    ));
    let gate = Arc::new(AuthorizationGate::new(tokens.clone()));

    let state = AppState {
        authenticator: Arc::new(Authenticator::new(
            credential_store.clone(),
            hasher,
            tokens.clone(),
        )),
        users: Arc::new(UserService::new(credential_store, hasher, gate.clone())),
        posts: Arc::new(PostService::new(post_store, gate)),
    };

    info!("🔐 Auth core initialized, db at: {}", config.database_path);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postboard_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
