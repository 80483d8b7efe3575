//! Admin authentication middleware.
//!
//! Admin routes require an `X-API-Key` header whose SHA-256 digest matches
//! `security.admin_api_key_hash`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::crypto::verify_key_hash;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::trace_id::get_request_id;

/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware for admin-only routes.
///
/// Returns 403 when no admin key is configured and 401 when the presented
/// key is missing or wrong.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match check_admin_key(&state, &req) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::warn!(
                request_id = %get_request_id(req.extensions()),
                path = %req.uri().path(),
                "Rejected admin request: {}",
                err
            );
            err.into_response()
        }
    }
}

fn check_admin_key(state: &AppState, req: &Request<Body>) -> Result<(), ApiError> {
    let expected = &state.config.security.admin_api_key_hash;
    if expected.is_empty() {
        return Err(ApiError::Forbidden("Admin API is not configured".to_string()));
    }

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))?;

    if verify_key_hash(presented, expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Invalid or missing API key".to_string()))
    }
}
