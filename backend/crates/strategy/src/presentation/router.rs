//! Strategy Routers
//!
//! Three routers so the binary can mount them under separate prefixes and
//! put only the protected ones behind the auth middleware.

use axum::{
    Router,
    routing::{get, put},
};

use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::presentation::handlers::{self, StrategyAppState};

/// Public catalog routes (`/`, `/random`, `/{id}`)
pub fn strategies_router<R>(state: StrategyAppState<R>) -> Router
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    Router::new()
        .route("/", get(handlers::list_strategies::<R>))
        .route("/random", get(handlers::random_strategy::<R>))
        .route("/{id}", get(handlers::get_strategy::<R>))
        .with_state(state)
}

/// Per-user favorites (`/`, `/{id}`); needs an `Identity` extension
pub fn favorites_router<R>(state: StrategyAppState<R>) -> Router
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    Router::new()
        .route("/", get(handlers::list_favorites::<R>))
        .route(
            "/{id}",
            put(handlers::add_favorite::<R>).delete(handlers::remove_favorite::<R>),
        )
        .with_state(state)
}

/// Per-user daily record (`/`); needs an `Identity` extension
pub fn daily_router<R>(state: StrategyAppState<R>) -> Router
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    Router::new()
        .route("/", get(handlers::get_daily::<R>).put(handlers::set_daily::<R>))
        .with_state(state)
}
