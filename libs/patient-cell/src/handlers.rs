use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use appointment_cell::services::lifecycle::AppointmentLifecycleService;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{CreatePatientRequest, UpdatePatientRequest};
use crate::services::patient::PatientService;

/// Self-or-admin rule shared by the per-patient endpoints.
fn ensure_self_or_admin(user: &AuthUser, patient_id: u64) -> Result<(), AppError> {
    if !user.is_admin() && user.id != patient_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state.store);
    let patients = service.list_patients().await;
    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&state.store);
    let patient = service.create_patient(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Patient created successfully",
            "patient": {
                "id": patient.id,
                "name": patient.name,
                "email": patient.email,
                "phone": patient.phone
            }
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<u64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    ensure_self_or_admin(&user, patient_id)?;

    let service = PatientService::new(&state.store);
    let patient = service.get_patient(patient_id).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<u64>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    ensure_self_or_admin(&user, patient_id)?;

    let service = PatientService::new(&state.store);
    service.update_patient(patient_id, request).await?;

    Ok(Json(json!({ "message": "Patient updated successfully" })))
}

#[axum::debug_handler]
pub async fn patient_consultations(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<u64>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    ensure_self_or_admin(&user, patient_id)?;

    let service = AppointmentLifecycleService::new(&state.store);
    let consultations = service.list_for_patient(patient_id).await;
    Ok(Json(json!(consultations)))
}
