use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Canceled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "SCHEDULED"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELED" => Ok(AppointmentStatus::Canceled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentKind {
    InPerson,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    pub professional_id: u64,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub kind: AppointmentKind,
    #[serde(default)]
    pub remote_link: String,
    pub created_at: DateTime<Utc>,
    pub created_by: u64,
}

impl Appointment {
    /// Deterministic session link for remote appointments.
    pub fn remote_link_for(id: u64) -> String {
        format!("https://telemed.local/consulta/{id}")
    }
}

/// Appointment enriched with display names from the user and professional
/// directories. Lookups are best-effort; a missing directory entry leaves
/// the name absent.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_name: Option<String>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub professional_id: Option<u64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub kind: Option<AppointmentKind>,
    pub patient_id: Option<u64>,
}

/// Update payload. `status` stays a plain string: unrecognized values are
/// ignored, not rejected. `patient_id`/`professional_id` take part in the
/// ownership check but are never written back (see lifecycle service).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub patient_id: Option<u64>,
    pub professional_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub notes: Option<String>,
}

/// Removed appointment plus the rule that authorized the removal.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub appointment: Appointment,
    pub reason: String,
}

// ==============================================================================
// SIDE-EFFECT RECORDS
// ==============================================================================

/// Written exactly once, when an appointment is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub appointment_id: u64,
    pub professional_id: u64,
    pub patient_id: u64,
    pub timestamp: DateTime<Utc>,
    pub notes: String,
}

/// Append-only patient history entry, created alongside each attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalRecordEntry {
    pub patient_id: u64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub professional_id: u64,
    pub appointment_id: u64,
}

/// Append-only; never read back by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub recipient_id: u64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Time slot already booked for this professional")]
    SlotTaken,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Patient id is required")]
    PatientRequired,

    #[error("Professionals may only book their own calendar")]
    NotYourCalendar,

    #[error("Access denied")]
    Forbidden,

    #[error("This appointment is not yours to complete")]
    NotYourAppointment,

    #[error("Completed appointments cannot be deleted, cancel them instead")]
    CompletedImmutable,

    #[error("Appointment is not scheduled")]
    NotScheduled,

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::SlotTaken => AppError::Conflict(err.to_string()),
            AppointmentError::MissingField(_) | AppointmentError::PatientRequired => {
                AppError::Validation(err.to_string())
            }
            AppointmentError::NotYourCalendar
            | AppointmentError::Forbidden
            | AppointmentError::NotYourAppointment => AppError::Forbidden(err.to_string()),
            AppointmentError::CompletedImmutable | AppointmentError::NotScheduled => {
                AppError::State(err.to_string())
            }
            AppointmentError::Store(msg) => AppError::Store(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&AppointmentStatus::Canceled).unwrap();
        assert_eq!(json, "\"CANCELED\"");
        let back: AppointmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AppointmentStatus::Canceled);
    }

    #[test]
    fn unknown_status_strings_do_not_parse() {
        assert!("RESOLVED".parse::<AppointmentStatus>().is_err());
        assert!("scheduled".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn remote_link_is_deterministic() {
        assert_eq!(
            Appointment::remote_link_for(12),
            "https://telemed.local/consulta/12"
        );
    }
}
