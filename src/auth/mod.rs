//! Authentication Module
//! Mission: Password storage, token issuance, and ownership checks

pub mod api;
pub mod authenticator;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use authenticator::Authenticator;
pub use error::AuthError;
pub use gate::AuthorizationGate;
pub use jwt::TokenService;
pub use password::PasswordHasher;
pub use service::UserService;
pub use user_store::CredentialStore;
