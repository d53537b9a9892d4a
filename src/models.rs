//! Application configuration

use crate::auth::password::PasswordHasher;

/// Process-wide configuration, loaded once at startup and passed into
/// constructors. The signing secret never lives in a global.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub kdf_iterations: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./postboard.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

        let token_ttl_secs = std::env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        let kdf_iterations = std::env::var("KDF_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(PasswordHasher::DEFAULT_ITERATIONS);

        Ok(Self {
            database_path,
            port,
            jwt_secret,
            token_ttl_secs,
            kdf_iterations,
        })
    }
}
