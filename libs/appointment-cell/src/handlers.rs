use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    AppointmentError, CompleteAppointmentRequest, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state.store);
    let appointments = service.list_for(&user).await;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AppointmentLifecycleService::new(&state.store);
    let appointment = service.create(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment scheduled successfully",
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<u64>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state.store);
    let appointment = service.update(&user, appointment_id, request).await?;

    Ok(Json(json!({
        "message": "Appointment updated",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<u64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentLifecycleService::new(&state.store);
    let outcome = service.delete(&user, appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully",
        "deleted_id": appointment_id,
        "appointment": outcome.appointment,
        "reason": outcome.reason,
        "timestamp": Utc::now()
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<u64>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    // Notes are validated before the lookup so a bad payload reports 400
    // even for an unknown appointment id.
    let notes = request
        .notes
        .ok_or(AppointmentError::MissingField("notes"))?;

    let service = AppointmentLifecycleService::new(&state.store);
    let attendance = service.complete(&user, appointment_id, notes).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Attendance recorded",
            "attendance": attendance
        })),
    ))
}
