use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use patient_cell::router::patient_routes;
use shared_store::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Telemed API is running!" }))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "online",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": [
                "POST /auth/login",
                "POST /auth/register",
                "GET /auth/me"
            ],
            "patients": [
                "GET /patients",
                "POST /patients",
                "GET /patients/{id}",
                "PUT /patients/{id}",
                "GET /patients/{id}/consultations"
            ],
            "appointments": [
                "GET /appointments",
                "POST /appointments",
                "PUT /appointments/{id}",
                "DELETE /appointments/{id}",
                "POST /appointments/{id}/complete"
            ]
        }
    }))
}
