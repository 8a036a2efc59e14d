use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_models::records::{
    find_user, find_user_by_email, PatientRecord, ProfessionalRecord, UserRecord,
};
use shared_store::{next_id, AppState, Collection};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{LoginRequest, RegisterRequest};

fn require_field<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing required field: {field}")))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = require_field(request.name.clone(), "name")?;
    let email = require_field(request.email.clone(), "email")?;
    let password = require_field(request.password.clone(), "password")?;
    let role_raw = require_field(request.role.clone(), "role")?;

    let role: Role = role_raw
        .parse()
        .map_err(|_| AppError::Validation("Invalid role".to_string()))?;

    let password_hash = hash_password(&password).map_err(AppError::Internal)?;
    let created_at = Utc::now();

    // Email uniqueness is checked under the users lock so two concurrent
    // registrations cannot both claim the same address.
    let user = {
        let name = name.clone();
        let email = email.clone();
        state
            .store
            .update(Collection::Users, move |users: &mut Vec<UserRecord>| {
                if find_user_by_email(users, &email).is_some() {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
                let id = next_id(users.iter().map(|u| u.id));
                let user = UserRecord {
                    id,
                    name,
                    email,
                    password_hash,
                    role,
                    created_at,
                };
                users.push(user.clone());
                Ok(user)
            })
            .await??
    };

    debug!("Registered user {} with role {}", user.id, role);

    match role {
        Role::Patient => {
            let profile = PatientRecord {
                id: user.id,
                phone: request.phone.unwrap_or_default(),
                birth_date: request.birth_date.unwrap_or_default(),
                address: request.address.unwrap_or_else(|| json!({})),
                created_at,
            };
            state
                .store
                .update(Collection::Patients, move |patients: &mut Vec<PatientRecord>| {
                    patients.push(profile);
                })
                .await?;
        }
        Role::Professional => {
            let profile = ProfessionalRecord {
                id: user.id,
                name: name.clone(),
                specialty: request.specialty.unwrap_or_default(),
                license_number: request.license_number.unwrap_or_default(),
                created_at,
            };
            state
                .store
                .update(
                    Collection::Professionals,
                    move |professionals: &mut Vec<ProfessionalRecord>| {
                        professionals.push(profile);
                    },
                )
                .await?;
        }
        Role::Admin => {}
    }

    let token = issue_token(
        user.id,
        role,
        state.config.token_ttl_secs as i64,
        &state.config.jwt_secret,
    )
    .map_err(AppError::Internal)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "access_token": token,
            "token_type": "Bearer",
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "role": user.role
            }
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(AppError::Validation("Email and password are required".to_string()));
    };

    let users: Vec<UserRecord> = state.store.load(Collection::Users).await;
    let user = find_user_by_email(&users, &email)
        .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

    if !verify_password(&password, &user.password_hash) {
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let token = issue_token(
        user.id,
        user.role,
        state.config.token_ttl_secs as i64,
        &state.config.jwt_secret,
    )
    .map_err(AppError::Internal)?;

    let mut user_info = json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role
    });

    // Enrich with the role profile, best-effort.
    match user.role {
        Role::Patient => {
            let patients: Vec<PatientRecord> = state.store.load(Collection::Patients).await;
            if let Some(profile) = patients.iter().find(|p| p.id == user.id) {
                user_info["phone"] = json!(profile.phone);
            }
        }
        Role::Professional => {
            let professionals: Vec<ProfessionalRecord> =
                state.store.load(Collection::Professionals).await;
            if let Some(profile) = professionals.iter().find(|p| p.id == user.id) {
                user_info["full_name"] = json!(profile.name);
                user_info["specialty"] = json!(profile.specialty);
            }
        }
        Role::Admin => {}
    }

    debug!("User {} logged in", user.id);

    Ok(Json(json!({
        "message": "Login successful",
        "access_token": token,
        "token_type": "Bearer",
        "user": user_info
    })))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let users: Vec<UserRecord> = state.store.load(Collection::Users).await;
    let user = find_user(&users, auth.id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut response = json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "created_at": user.created_at
    });

    match user.role {
        Role::Patient => {
            let patients: Vec<PatientRecord> = state.store.load(Collection::Patients).await;
            if let Some(profile) = patients.iter().find(|p| p.id == user.id) {
                response["phone"] = json!(profile.phone);
                response["birth_date"] = json!(profile.birth_date);
                response["address"] = profile.address.clone();
            }
        }
        Role::Professional => {
            let professionals: Vec<ProfessionalRecord> =
                state.store.load(Collection::Professionals).await;
            if let Some(profile) = professionals.iter().find(|p| p.id == user.id) {
                response["full_name"] = json!(profile.name);
                response["specialty"] = json!(profile.specialty);
                response["license_number"] = json!(profile.license_number);
            }
        }
        Role::Admin => {}
    }

    Ok(Json(response))
}
