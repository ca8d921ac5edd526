//! Auth Router

use axum::{Router, middleware, routing::get};

use crate::domain::verifier::IdentityVerifier;
use crate::presentation::handlers;
use crate::presentation::middleware::{AuthMiddlewareState, require_identity};

/// Create the Auth router for any verifier implementation
///
/// `/me` requires a verified identity; `/health` is public.
pub fn auth_router<V>(state: AuthMiddlewareState<V>) -> Router
where
    V: IdentityVerifier + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn_with_state(
                state,
                require_identity::<V>,
            )),
        )
        .route("/health", get(handlers::health))
}
