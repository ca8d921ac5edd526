//! Router assembly
//!
//! Public routes: `/api/strategies/*`, `/api/auth/health`.
//! Bearer-protected: `/api/favorites/*`, `/api/daily`, `/api/auth/me`.

use auth::{AuthMiddlewareState, IdentityVerifier, auth_router, require_identity};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use strategy::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use strategy::{StrategyAppState, daily_router, favorites_router, strategies_router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ClientOrigins;

pub fn cors_layer(origins: &ClientOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    match origins {
        // credentials cannot be combined with a wildcard origin
        ClientOrigins::Any => cors.allow_origin(AllowOrigin::any()),
        ClientOrigins::List(list) => {
            let allowed: Vec<http::HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                        None
                    }
                })
                .collect();
            cors.allow_origin(allowed).allow_credentials(true)
        }
    }
}

pub fn build_router<R, V>(
    strategies: StrategyAppState<R>,
    auth: AuthMiddlewareState<V>,
    origins: &ClientOrigins,
) -> Router
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
    V: IdentityVerifier + Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .nest("/api/favorites", favorites_router(strategies.clone()))
        .nest("/api/daily", daily_router(strategies.clone()))
        .route_layer(middleware::from_fn_with_state(
            auth.clone(),
            require_identity::<V>,
        ));

    Router::new()
        .nest("/api/strategies", strategies_router(strategies))
        .nest("/api/auth", auth_router(auth))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(origins)),
        )
}
