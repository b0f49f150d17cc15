//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the admin routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::identity::bearer_token;
use crate::web::state::AppState;

/// The verified admin user id, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUserId(pub String);

/// Middleware that validates the bearer token and extracts the user id.
///
/// If valid, inserts the user id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id = state.auth_adapter.verify(token).await.map_err(|e| {
        error!("Failed to verify bearer token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(AuthUserId(user_id));

    Ok(next.run(req).await)
}
