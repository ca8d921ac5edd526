//! Manage Favorites Use Case

use kernel::id::{StrategyId, UserId};
use std::sync::Arc;

use crate::domain::repository::{FavoritesRepository, StrategyCatalog};
use crate::error::{StrategyError, StrategyResult};

/// Per-user favorite membership on the server
pub struct ManageFavoritesUseCase<R>
where
    R: StrategyCatalog + FavoritesRepository,
{
    repo: Arc<R>,
}

impl<R> ManageFavoritesUseCase<R>
where
    R: StrategyCatalog + FavoritesRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user: &UserId) -> StrategyResult<Vec<StrategyId>> {
        self.repo.list(user).await
    }

    /// Add `id`; unknown strategies are rejected before anything is written
    pub async fn add(&self, user: &UserId, id: StrategyId) -> StrategyResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(StrategyError::NotFound(Some(id)));
        }

        self.repo.add(user, id).await?;
        tracing::info!(user_id = %user, strategy_id = %id, "Favorite added");
        Ok(())
    }

    pub async fn remove(&self, user: &UserId, id: StrategyId) -> StrategyResult<()> {
        self.repo.remove(user, id).await?;
        tracing::info!(user_id = %user, strategy_id = %id, "Favorite removed");
        Ok(())
    }
}
