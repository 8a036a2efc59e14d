use serde::Deserialize;
use serde_json::Value;

/// Registration payload. Everything is optional at the serde layer so the
/// handler can name the first missing required field in its 400.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    // Patient profile extras
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<Value>,
    // Professional profile extras
    pub specialty: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
