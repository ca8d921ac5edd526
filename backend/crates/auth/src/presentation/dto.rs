//! API DTOs (Data Transfer Objects)

use kernel::identity::Identity;
use serde::{Deserialize, Serialize};

/// Response for GET /api/auth/me
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: Identity,
    pub message: String,
}

/// Response for GET /api/auth/health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
