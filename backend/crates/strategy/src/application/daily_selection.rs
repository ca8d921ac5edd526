//! Daily Selection
//!
//! Answers "what is today's strategy" once per calendar day per device.
//! The choice is persisted in the durable store as a [`DailyRecord`] keyed
//! by the UTC calendar day; the record is compared against today on every
//! resolve, so a new day needs no timer.

use platform::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::config::StrategyConfig;
use crate::application::provider::StrategiesProvider;
use crate::domain::entities::{DailyRecord, Strategy};
use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::domain::value_objects::CalendarDay;

/// Resolution state of today's strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyState {
    /// No strategy could be picked yet (empty catalog)
    Uninitialized,
    /// Fixed for the rest of this session
    Resolved(Strategy),
}

impl DailyState {
    pub fn strategy(&self) -> Option<&Strategy> {
        match self {
            DailyState::Uninitialized => None,
            DailyState::Resolved(strategy) => Some(strategy),
        }
    }
}

/// Daily selection policy over a provider and a durable store
pub struct DailySelection<R, S> {
    provider: Arc<StrategiesProvider<R>>,
    store: Arc<S>,
    key: String,
    state: Mutex<DailyState>,
}

impl<R, S> DailySelection<R, S>
where
    R: StrategyCatalog + FavoritesRepository + DailyRecordRepository + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    pub fn new(provider: Arc<StrategiesProvider<R>>, store: Arc<S>, config: &StrategyConfig) -> Self {
        Self {
            provider,
            store,
            key: config.daily_storage_key.clone(),
            state: Mutex::new(DailyState::Uninitialized),
        }
    }

    pub async fn current(&self) -> DailyState {
        self.state.lock().await.clone()
    }

    /// Resolve today's strategy
    ///
    /// Reuses the persisted record when it is dated today and its strategy
    /// is in the cache. Failing that, a signed-in user's server record for
    /// today is adopted without being written back. Otherwise a random
    /// strategy is picked, persisted and mirrored to the server.
    /// Stays `Uninitialized` while the cache is empty, and can be called
    /// again once it is loaded. Once resolved, the value is fixed.
    pub async fn resolve(&self) -> DailyState {
        let mut state = self.state.lock().await;
        if let DailyState::Resolved(_) = &*state {
            return state.clone();
        }

        let today = CalendarDay::today(self.provider.clock().as_ref());

        if let Some(record) = self.read_record().await.filter(|r| r.is_for(today)) {
            match self.provider.get_by_id(record.strategy_id) {
                Some(strategy) => {
                    tracing::debug!(strategy_id = %strategy.id, date = %today, "Reusing today's strategy");
                    *state = DailyState::Resolved(strategy);
                    return state.clone();
                }
                None => {
                    tracing::debug!(
                        strategy_id = %record.strategy_id,
                        "Persisted daily strategy not in catalog, picking again"
                    );
                }
            }
        }

        if let Some(strategy) = self.provider.today_strategy() {
            // already recorded on the server by another device; adopt it locally
            tracing::debug!(strategy_id = %strategy.id, date = %today, "Adopting server's daily strategy");
            self.persist(&DailyRecord::new(strategy.id, today)).await;
            *state = DailyState::Resolved(strategy);
            return state.clone();
        }

        let Some(strategy) = self.provider.get_random() else {
            tracing::debug!("Catalog empty, daily strategy not resolved yet");
            return DailyState::Uninitialized;
        };

        let record = DailyRecord::new(strategy.id, today);
        self.persist(&record).await;
        self.mirror(&record).await;

        tracing::info!(strategy_id = %strategy.id, date = %today, "Picked today's strategy");
        *state = DailyState::Resolved(strategy);
        state.clone()
    }

    /// Resolve, waiting for catalog loads until a strategy can be picked
    ///
    /// Only successful loads wake the wait, so while every load fails this
    /// does not return; callers that need a bound wrap it in
    /// `tokio::time::timeout`. Returns `None` if the provider goes away first.
    pub async fn resolve_when_ready(&self) -> Option<Strategy> {
        let mut generations = self.provider.subscribe();
        loop {
            if let DailyState::Resolved(strategy) = self.resolve().await {
                return Some(strategy);
            }
            if generations.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Persisted record; unreadable or malformed data counts as absent
    async fn read_record(&self) -> Option<DailyRecord> {
        let raw = match self.store.get(&self.key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read daily record");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Ignoring malformed daily record");
                None
            }
        }
    }

    async fn persist(&self, record: &DailyRecord) {
        let result = match serde_json::to_string(record) {
            Ok(json) => self.store.set(&self.key, &json).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist daily record");
        }
    }

    /// Best-effort copy to the server for signed-in users
    async fn mirror(&self, record: &DailyRecord) {
        if self.provider.identity().is_none() {
            return;
        }
        if let Err(e) = self.provider.set_daily_strategy(record.strategy_id).await {
            tracing::warn!(strategy_id = %record.strategy_id, error = %e, "Failed to mirror daily strategy");
        }
    }
}
