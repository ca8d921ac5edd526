//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::id::StrategyId;
use platform::clock::Clock;
use std::sync::Arc;

use crate::application::browse_strategies::BrowseStrategiesUseCase;
use crate::application::manage_favorites::ManageFavoritesUseCase;
use crate::application::record_daily::RecordDailyUseCase;
use crate::domain::entities::Strategy;
use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::error::StrategyResult;
use crate::presentation::dto::{DailyResponse, SetDailyRequest};
use crate::presentation::extract::{CurrentUser, parse_strategy_id};

/// Shared state for strategy handlers
#[derive(Clone)]
pub struct StrategyAppState<R>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub repo: Arc<R>,
    pub clock: Arc<dyn Clock>,
}

impl<R> StrategyAppState<R>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn new(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo: Arc::new(repo),
            clock,
        }
    }
}

/// GET /api/strategies
pub async fn list_strategies<R>(
    State(state): State<StrategyAppState<R>>,
) -> StrategyResult<Json<Vec<Strategy>>>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = BrowseStrategiesUseCase::new(state.repo.clone());
    Ok(Json(use_case.list().await?))
}

/// GET /api/strategies/random
pub async fn random_strategy<R>(
    State(state): State<StrategyAppState<R>>,
) -> StrategyResult<Json<Strategy>>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = BrowseStrategiesUseCase::new(state.repo.clone());
    Ok(Json(use_case.random().await?))
}

/// GET /api/strategies/{id}
pub async fn get_strategy<R>(
    State(state): State<StrategyAppState<R>>,
    Path(raw_id): Path<String>,
) -> StrategyResult<Json<Strategy>>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let id = parse_strategy_id(&raw_id)?;
    let use_case = BrowseStrategiesUseCase::new(state.repo.clone());
    Ok(Json(use_case.by_id(id).await?))
}

/// GET /api/favorites
pub async fn list_favorites<R>(
    State(state): State<StrategyAppState<R>>,
    CurrentUser(identity): CurrentUser,
) -> StrategyResult<Json<Vec<StrategyId>>>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = ManageFavoritesUseCase::new(state.repo.clone());
    Ok(Json(use_case.list(&identity.uid).await?))
}

/// PUT /api/favorites/{id}
pub async fn add_favorite<R>(
    State(state): State<StrategyAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Path(raw_id): Path<String>,
) -> StrategyResult<StatusCode>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let id = parse_strategy_id(&raw_id)?;
    let use_case = ManageFavoritesUseCase::new(state.repo.clone());
    use_case.add(&identity.uid, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/favorites/{id}
pub async fn remove_favorite<R>(
    State(state): State<StrategyAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Path(raw_id): Path<String>,
) -> StrategyResult<StatusCode>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let id = parse_strategy_id(&raw_id)?;
    let use_case = ManageFavoritesUseCase::new(state.repo.clone());
    use_case.remove(&identity.uid, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/daily
pub async fn get_daily<R>(
    State(state): State<StrategyAppState<R>>,
    CurrentUser(identity): CurrentUser,
) -> StrategyResult<Json<DailyResponse>>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = RecordDailyUseCase::new(state.repo.clone(), state.clock.clone());
    let record = use_case.get_today(&identity.uid).await?;
    Ok(Json(record.into()))
}

/// PUT /api/daily
pub async fn set_daily<R>(
    State(state): State<StrategyAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Json(req): Json<SetDailyRequest>,
) -> StrategyResult<Json<DailyResponse>>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let use_case = RecordDailyUseCase::new(state.repo.clone(), state.clock.clone());
    let record = use_case.set_today(&identity.uid, req.strategy_id).await?;
    Ok(Json(record.into()))
}
