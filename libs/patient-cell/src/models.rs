use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_models::error::AppError;

/// Patient profile joined with its user account for display.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub address: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<Value>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::EmailTaken => AppError::Conflict(err.to_string()),
            PatientError::MissingField(_) => AppError::Validation(err.to_string()),
            PatientError::Store(msg) => AppError::Store(msg),
        }
    }
}
