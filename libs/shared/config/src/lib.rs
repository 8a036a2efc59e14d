use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Fallback signing secret used when neither JWT_SECRET_KEY nor SECRET_KEY
/// is set. Running with it is a known security gap.
pub const DEFAULT_JWT_SECRET: &str = "telemed-super-secret-key-change-in-production";

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub data_dir: PathBuf,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET_KEY")
            .or_else(|_| env::var("SECRET_KEY"))
            .unwrap_or_else(|_| {
                warn!("JWT_SECRET_KEY not set, using insecure default secret");
                DEFAULT_JWT_SECRET.to_string()
            });

        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                warn!("DATA_DIR not set, using default directory 'database'");
                PathBuf::from("database")
            });

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Self {
            jwt_secret,
            token_ttl_secs,
            data_dir,
            port,
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
