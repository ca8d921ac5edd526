//! Request Extractors

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kernel::id::StrategyId;
use kernel::identity::Identity;

use crate::error::StrategyError;

/// Caller identity attached by the auth middleware
///
/// Rejects with 401 when the route is not behind `require_identity` or the
/// middleware let the request through without one.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StrategyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StrategyError::Unauthenticated("access this resource"))
    }
}

/// Parse an `{id}` path segment; anything but an integer is an unknown strategy
pub fn parse_strategy_id(raw: &str) -> Result<StrategyId, StrategyError> {
    raw.parse().map_err(|_| {
        tracing::debug!(raw = %raw, "Non-numeric strategy id");
        StrategyError::NotFound(None)
    })
}
