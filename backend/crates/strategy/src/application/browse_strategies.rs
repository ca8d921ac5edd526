//! Browse Strategies Use Case

use kernel::id::StrategyId;
use rand::seq::IndexedRandom;
use std::sync::Arc;

use crate::domain::entities::Strategy;
use crate::domain::repository::StrategyCatalog;
use crate::error::{StrategyError, StrategyResult};

/// Read-only catalog access for the public strategy endpoints
pub struct BrowseStrategiesUseCase<C>
where
    C: StrategyCatalog,
{
    catalog: Arc<C>,
}

impl<C> BrowseStrategiesUseCase<C>
where
    C: StrategyCatalog,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub async fn list(&self) -> StrategyResult<Vec<Strategy>> {
        self.catalog.fetch_all().await
    }

    pub async fn by_id(&self, id: StrategyId) -> StrategyResult<Strategy> {
        self.catalog
            .find_by_id(id)
            .await?
            .ok_or(StrategyError::NotFound(Some(id)))
    }

    /// Uniform pick; `NotFound` on an empty catalog
    pub async fn random(&self) -> StrategyResult<Strategy> {
        let strategies = self.catalog.fetch_all().await?;
        let picked = strategies.choose(&mut rand::rng()).cloned();
        picked.ok_or(StrategyError::NotFound(None))
    }
}
