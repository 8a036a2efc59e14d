use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Role;

/// Account record in the `users` collection. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Patient profile, 1:1 with a PATIENT user (same id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: u64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default = "empty_object")]
    pub address: Value,
    pub created_at: DateTime<Utc>,
}

/// Professional profile, 1:1 with a PROFESSIONAL user (same id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub license_number: String,
    pub created_at: DateTime<Utc>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

pub fn find_user(users: &[UserRecord], id: u64) -> Option<&UserRecord> {
    users.iter().find(|u| u.id == id)
}

pub fn find_user_by_email<'a>(users: &'a [UserRecord], email: &str) -> Option<&'a UserRecord> {
    users.iter().find(|u| u.email == email)
}
