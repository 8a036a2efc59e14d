use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::{auth_middleware, require_professional};

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    // Completing an attendance is staff-only; everything else is gated by
    // the per-operation rules in the lifecycle service.
    let staff_routes = Router::new()
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        .layer(middleware::from_fn(require_professional));

    let protected_routes = Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::create_appointment))
        .route(
            "/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::delete_appointment),
        );

    Router::new()
        .merge(protected_routes)
        .merge(staff_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
