use std::path::Path;
use std::sync::Arc;

use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_store::AppState;

use crate::jwt::issue_token;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

/// App state wired to a throwaway data directory (tests own the tempdir).
pub fn test_state(data_dir: &Path) -> Arc<AppState> {
    let config = AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_secs: 3600,
        data_dir: data_dir.to_path_buf(),
        port: 0,
    };
    Arc::new(AppState::new(config))
}

#[derive(Debug, Clone, Copy)]
pub struct TestUser {
    pub id: u64,
    pub role: Role,
}

impl TestUser {
    pub fn admin(id: u64) -> Self {
        Self { id, role: Role::Admin }
    }

    pub fn professional(id: u64) -> Self {
        Self { id, role: Role::Professional }
    }

    pub fn patient(id: u64) -> Self {
        Self { id, role: Role::Patient }
    }

    pub fn token(&self) -> String {
        issue_token(self.id, self.role, 3600, TEST_JWT_SECRET).expect("test token")
    }

    pub fn expired_token(&self) -> String {
        issue_token(self.id, self.role, -60, TEST_JWT_SECRET).expect("test token")
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }
}
