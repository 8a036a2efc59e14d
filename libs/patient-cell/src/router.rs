use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

pub fn patient_routes(state: Arc<AppState>) -> Router {
    // Listing and creating patients is admin-only; per-patient routes
    // apply the self-or-admin rule in their handlers.
    let admin_routes = Router::new()
        .route("/", get(handlers::list_patients).post(handlers::create_patient))
        .layer(middleware::from_fn(require_admin));

    let self_routes = Router::new()
        .route(
            "/{patient_id}",
            get(handlers::get_patient).put(handlers::update_patient),
        )
        .route("/{patient_id}/consultations", get(handlers::patient_consultations));

    Router::new()
        .merge(admin_routes)
        .merge(self_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
