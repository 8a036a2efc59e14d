use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::jwt::validate_token;

/// Authentication guard. Binds an `AuthUser` into the request extensions on
/// success; both malformed and expired tokens collapse into the same 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authentication token".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Missing authentication token".to_string()));
    }

    let token = &auth_value[7..];

    let user = validate_token(token, &state.config.jwt_secret).map_err(|e| {
        debug!("Token rejected: {}", e);
        AppError::Auth("Invalid or expired token".to_string())
    })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn current_user(request: &Request<Body>) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}

/// Role guard: ADMIN only. Layered inside `auth_middleware`.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }
    Ok(next.run(request).await)
}

/// Role guard: PROFESSIONAL or ADMIN. Layered inside `auth_middleware`.
pub async fn require_professional(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    if !user.is_professional() && !user.is_admin() {
        return Err(AppError::Forbidden("Professional or admin role required".to_string()));
    }
    Ok(next.run(request).await)
}
