//! Strategies Provider
//!
//! Client-side owner of the strategy catalog, the signed-in user's
//! favorites and today's server-side daily record. Every other component
//! reads through it; only its own methods mutate this state.
//!
//! ## Consistency rules
//! - `load()` has at most one fetch in flight; concurrent callers wait for
//!   it and report its outcome instead of fetching again.
//! - Fetch failures are recorded in [`ProviderStatus`], never raised.
//! - `toggle_favorite()` is serialized per strategy id and updates local
//!   state only after the remote call succeeded.
//! - Results of remote calls started under a previous identity are dropped.

use dashmap::DashMap;
use kernel::id::{StrategyId, UserId};
use kernel::identity::Identity;
use platform::clock::Clock;
use rand::seq::IndexedRandom;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, watch};

use crate::domain::entities::{DailyRecord, Strategy};
use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::domain::value_objects::CalendarDay;
use crate::error::{StrategyError, StrategyResult};

/// Snapshot of the provider's loading state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderStatus {
    pub loading: bool,
    pub error: Option<String>,
    pub strategy_count: usize,
}

#[derive(Default)]
struct ProviderState {
    strategies: Arc<Vec<Strategy>>,
    favorites: Vec<StrategyId>,
    identity: Option<Identity>,
    identity_epoch: u64,
    today: Option<DailyRecord>,
    loading: bool,
    catalog_error: Option<String>,
    favorites_error: Option<String>,
}

impl ProviderState {
    fn current_user(&self) -> Option<(UserId, u64)> {
        self.identity
            .as_ref()
            .map(|identity| (identity.uid.clone(), self.identity_epoch))
    }
}

/// Shared strategy state for one client session
pub struct StrategiesProvider<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    state: RwLock<ProviderState>,
    load_gate: Mutex<()>,
    toggle_locks: DashMap<StrategyId, Arc<Mutex<()>>>,
    generation: watch::Sender<u64>,
}

impl<R> StrategiesProvider<R>
where
    R: StrategyCatalog + FavoritesRepository + DailyRecordRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            repo,
            clock,
            state: RwLock::new(ProviderState::default()),
            load_gate: Mutex::new(()),
            toggle_locks: DashMap::new(),
            generation,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ProviderState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProviderState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch the full catalog from the store
    ///
    /// On success the cached list is replaced, the error cleared and the
    /// catalog generation bumped. On failure the previous list is kept.
    pub async fn load(&self) -> ProviderStatus {
        let _gate = match self.load_gate.try_lock() {
            Ok(gate) => gate,
            Err(_) => {
                tracing::debug!("Joining in-flight strategy load");
                let _joined = self.load_gate.lock().await;
                return self.status();
            }
        };

        self.write().loading = true;
        let result = self.repo.fetch_all().await;

        let loaded = {
            let mut state = self.write();
            state.loading = false;
            match result {
                Ok(strategies) => {
                    let count = strategies.len();
                    state.strategies = Arc::new(strategies);
                    state.catalog_error = None;
                    Some(count)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load strategies");
                    state.catalog_error = Some(e.to_string());
                    None
                }
            }
        };

        if let Some(count) = loaded {
            self.generation.send_modify(|generation| *generation += 1);
            tracing::info!(count, "Strategy catalog loaded");
        }

        self.status()
    }

    pub fn status(&self) -> ProviderStatus {
        let state = self.read();
        ProviderStatus {
            loading: state.loading,
            error: state
                .catalog_error
                .clone()
                .or_else(|| state.favorites_error.clone()),
            strategy_count: state.strategies.len(),
        }
    }

    /// Cached catalog, ascending by id
    pub fn strategies(&self) -> Arc<Vec<Strategy>> {
        self.read().strategies.clone()
    }

    pub fn get_by_id(&self, id: StrategyId) -> Option<Strategy> {
        self.read().strategies.iter().find(|s| s.id == id).cloned()
    }

    /// Uniformly random cached strategy; `None` while the cache is empty
    pub fn get_random(&self) -> Option<Strategy> {
        let strategies = self.strategies();
        strategies.choose(&mut rand::rng()).cloned()
    }

    /// Number of successful loads so far
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Notified with the new generation after every successful load
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    // ========================================================================
    // Identity & favorites
    // ========================================================================

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    /// Switch the signed-in user
    ///
    /// A different uid starts a new identity epoch: favorites and today's
    /// record are cleared and re-fetched for the new user.
    pub async fn set_identity(&self, identity: Option<Identity>) -> ProviderStatus {
        let changed = {
            let mut state = self.write();
            let same_user =
                state.identity.as_ref().map(|i| &i.uid) == identity.as_ref().map(|i| &i.uid);
            state.identity = identity;
            if !same_user {
                state.identity_epoch += 1;
                state.favorites.clear();
                state.favorites_error = None;
                state.today = None;
            }
            !same_user
        };

        if changed {
            self.refresh_favorites().await;
            self.refresh_today_strategy().await;
        }

        self.status()
    }

    /// Replace local favorites with the authoritative set
    ///
    /// Without an identity the set is cleared. A failed fetch also clears
    /// it and records the error.
    pub async fn refresh_favorites(&self) -> ProviderStatus {
        let current = self.read().current_user();
        let Some((user, epoch)) = current else {
            {
                let mut state = self.write();
                state.favorites.clear();
                state.favorites_error = None;
            }
            return self.status();
        };

        let result = self.repo.list(&user).await;

        {
            let mut state = self.write();
            if state.identity_epoch != epoch {
                tracing::debug!(user_id = %user, "Discarding favorites fetched for a previous identity");
            } else {
                match result {
                    Ok(ids) => {
                        tracing::debug!(user_id = %user, count = ids.len(), "Favorites refreshed");
                        state.favorites = ids;
                        state.favorites_error = None;
                    }
                    Err(e) => {
                        tracing::error!(user_id = %user, error = %e, "Failed to fetch favorites");
                        state.favorites.clear();
                        state.favorites_error = Some(e.to_string());
                    }
                }
            }
        }

        self.status()
    }

    pub fn favorites(&self) -> Vec<StrategyId> {
        self.read().favorites.clone()
    }

    pub fn is_favorite(&self, id: StrategyId) -> bool {
        self.read().favorites.contains(&id)
    }

    /// Flip favorite membership of `id`; returns the new membership
    ///
    /// Local state changes only after the store accepted the change. Calls
    /// for the same id queue behind each other, so the second call sees the
    /// first one's result.
    pub async fn toggle_favorite(&self, id: StrategyId) -> StrategyResult<bool> {
        if self.read().identity.is_none() {
            return Err(StrategyError::Unauthenticated("manage favorites"));
        }

        let lock = self.toggle_locks.entry(id).or_default().clone();
        let _serial = lock.lock().await;

        let (user, epoch, was_favorite) = {
            let state = self.read();
            let (user, epoch) = state
                .current_user()
                .ok_or(StrategyError::Unauthenticated("manage favorites"))?;
            (user, epoch, state.favorites.contains(&id))
        };

        let remote = if was_favorite {
            self.repo.remove(&user, id).await
        } else {
            self.repo.add(&user, id).await
        };
        if let Err(e) = remote {
            tracing::warn!(strategy_id = %id, user_id = %user, error = %e, "Favorite toggle failed");
            return Err(e);
        }

        {
            let mut state = self.write();
            if state.identity_epoch == epoch {
                if was_favorite {
                    state.favorites.retain(|f| *f != id);
                } else if !state.favorites.contains(&id) {
                    state.favorites.push(id);
                }
            }
        }

        tracing::info!(strategy_id = %id, user_id = %user, favorite = !was_favorite, "Favorite toggled");
        Ok(!was_favorite)
    }

    // ========================================================================
    // Server-side daily record
    // ========================================================================

    /// Record `id` as today's strategy for the signed-in user
    pub async fn set_daily_strategy(&self, id: StrategyId) -> StrategyResult<DailyRecord> {
        let current = self.read().current_user();
        let (user, epoch) = current.ok_or(StrategyError::Unauthenticated("set daily strategy"))?;

        let record = DailyRecord::new(id, CalendarDay::today(self.clock.as_ref()));
        self.repo.save(&user, &record).await?;

        {
            let mut state = self.write();
            if state.identity_epoch == epoch {
                state.today = Some(record);
            }
        }

        tracing::info!(strategy_id = %id, user_id = %user, date = %record.date, "Daily strategy recorded");
        Ok(record)
    }

    /// Re-read today's record from the store
    ///
    /// Cleared without an identity; fetch failures are logged and clear it.
    pub async fn refresh_today_strategy(&self) -> Option<DailyRecord> {
        let current = self.read().current_user();
        let Some((user, epoch)) = current else {
            self.write().today = None;
            return None;
        };

        let today = CalendarDay::today(self.clock.as_ref());
        let record = match self.repo.find(&user, today).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(user_id = %user, error = %e, "Failed to fetch today's strategy");
                None
            }
        };

        let mut state = self.write();
        if state.identity_epoch != epoch {
            return None;
        }
        state.today = record;
        record
    }

    /// Today's server-side record, if it is still dated today
    pub fn today_record(&self) -> Option<DailyRecord> {
        let today = CalendarDay::today(self.clock.as_ref());
        self.read().today.filter(|record| record.is_for(today))
    }

    /// Strategy of today's server-side record, resolved against the cache
    pub fn today_strategy(&self) -> Option<Strategy> {
        self.today_record()
            .and_then(|record| self.get_by_id(record.strategy_id))
    }
}
