//! HTTP Handlers

use axum::{Extension, Json};
use kernel::identity::Identity;

use crate::presentation::dto::{HealthResponse, MeResponse};

/// GET /api/auth/me
///
/// Runs behind `require_identity`, so the identity extension is always set.
pub async fn me(Extension(identity): Extension<Identity>) -> Json<MeResponse> {
    Json(MeResponse {
        user: identity,
        message: "Authentication successful".to_string(),
    })
}

/// GET /api/auth/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Auth service is running",
    })
}
