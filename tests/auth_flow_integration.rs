//! End-to-end flows through the library surface: registration, login,
//! and ownership-gated post mutations, against a throwaway SQLite file.

use std::sync::Arc;
use tempfile::NamedTempFile;

use postboard_backend::auth::{
    error::AuthError, Authenticator, AuthorizationGate, CredentialStore, PasswordHasher,
    TokenService, UserService,
};
use postboard_backend::posts::{PostService, PostStore};

struct TestApp {
    authenticator: Authenticator,
    users: UserService,
    posts: PostService,
    tokens: Arc<TokenService>,
    _db: NamedTempFile,
}

fn test_app() -> TestApp {
    let db = NamedTempFile::new().unwrap();
    let db_path = db.path().to_str().unwrap();

    let credential_store = Arc::new(CredentialStore::new(db_path).unwrap());
    let post_store = Arc::new(PostStore::new(db_path).unwrap());

    // Full-strength derivation is deliberately slow; the flows under test
    // do not depend on the iteration count.
    let hasher = PasswordHasher::with_iterations(1_000);
    let tokens = Arc::new(TokenService::new("integration-test-secret"));
    let gate = Arc::new(AuthorizationGate::new(tokens.clone()));

    TestApp {
        authenticator: Authenticator::new(credential_store.clone(), hasher, tokens.clone()),
        users: UserService::new(credential_store, hasher, gate.clone()),
        posts: PostService::new(post_store, gate),
        tokens,
        _db: db,
    }
}

#[tokio::test]
async fn registration_rejects_duplicate_identity() {
    let app = test_app();

    app.users.register("asdf", "asdf").await.unwrap();

    let err = app.users.register("asdf", "asdf1").await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityAlreadyExists));
}

#[tokio::test]
async fn login_outcomes_are_distinct() {
    let app = test_app();
    app.users.register("asdf", "asdf").await.unwrap();

    let token = app.authenticator.authenticate("asdf", "asdf").await.unwrap();
    assert_eq!(app.tokens.verify(&token).unwrap(), "asdf");

    let err = app
        .authenticator
        .authenticate("asdf", "wrongPassword")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AuthenticationFailed));

    let err = app.authenticator.authenticate("nouser", "x").await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityNotFound));
}

#[tokio::test]
async fn post_mutations_are_owner_gated() {
    let app = test_app();
    app.users.register("asdf", "asdf").await.unwrap();
    app.users.register("fdsa", "fdsa").await.unwrap();

    let owner_token = app.authenticator.authenticate("asdf", "asdf").await.unwrap();
    let other_token = app.authenticator.authenticate("fdsa", "fdsa").await.unwrap();

    let post = app.posts.create(&owner_token, "hello", "world").unwrap();
    assert_eq!(post.author, "asdf");

    // Non-owner is refused on both mutations
    let err = app
        .posts
        .update(&other_token, &post.id, Some("hijack"), None)
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));

    let err = app.posts.delete(&other_token, &post.id).unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));

    // Reads stay public and unchanged
    assert_eq!(app.posts.get(&post.id).unwrap().title, "hello");

    // Owner passes
    let updated = app
        .posts
        .update(&owner_token, &post.id, Some("revised"), None)
        .unwrap();
    assert_eq!(updated.title, "revised");
    assert_eq!(updated.author, "asdf");

    app.posts.delete(&owner_token, &post.id).unwrap();
    assert!(matches!(
        app.posts.get(&post.id).unwrap_err(),
        AuthError::PostNotFound
    ));
}

#[tokio::test]
async fn password_change_rotates_credentials_but_not_tokens() {
    let app = test_app();
    app.users.register("asdf", "old-password").await.unwrap();

    let token = app
        .authenticator
        .authenticate("asdf", "old-password")
        .await
        .unwrap();

    app.users
        .change_password(&token, "asdf", "new-password")
        .await
        .unwrap();

    // Old credential no longer authenticates, new one does
    let err = app
        .authenticator
        .authenticate("asdf", "old-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AuthenticationFailed));

    app.authenticator
        .authenticate("asdf", "new-password")
        .await
        .unwrap();

    // The pre-change token is still valid until natural expiry — there is
    // no revocation list.
    assert_eq!(app.tokens.verify(&token).unwrap(), "asdf");
}

#[tokio::test]
async fn deleted_account_keeps_issued_tokens_until_expiry() {
    let app = test_app();
    app.users.register("asdf", "asdf").await.unwrap();

    let token = app.authenticator.authenticate("asdf", "asdf").await.unwrap();
    app.users.delete(&token, "asdf").unwrap();

    // Login is gone, but the stateless token still verifies
    let err = app.authenticator.authenticate("asdf", "asdf").await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityNotFound));
    assert_eq!(app.tokens.verify(&token).unwrap(), "asdf");
}

#[tokio::test]
async fn expired_token_is_refused_at_the_gate() {
    let db = NamedTempFile::new().unwrap();
    let db_path = db.path().to_str().unwrap();

    let post_store = Arc::new(PostStore::new(db_path).unwrap());
    let tokens = Arc::new(TokenService::with_ttl("integration-test-secret", -5));
    let gate = Arc::new(AuthorizationGate::new(tokens.clone()));
    let posts = PostService::new(post_store, gate);

    let stale = tokens.issue("asdf").unwrap();
    let err = posts.create(&stale, "hello", "world").unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));
}
