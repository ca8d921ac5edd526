//! In-Memory Strategy Store
//!
//! Backs the API when no database is configured (catalog from the static
//! JSON file, favorites and daily records lost on restart) and doubles as
//! the test fixture, with switches for simulating an unreachable store.

use dashmap::DashMap;
use kernel::id::{StrategyId, UserId};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::domain::entities::{DailyRecord, Strategy};
use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::domain::services::parse_catalog;
use crate::domain::value_objects::CalendarDay;
use crate::error::{StrategyError, StrategyResult};

#[derive(Default)]
struct Inner {
    strategies: RwLock<Vec<Strategy>>,
    favorites: DashMap<UserId, Vec<StrategyId>>,
    daily: DashMap<(UserId, CalendarDay), DailyRecord>,
    unavailable: AtomicBool,
    latency_ms: AtomicU64,
    fetches: AtomicUsize,
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStrategyStore {
    inner: Arc<Inner>,
}

impl MemoryStrategyStore {
    pub fn new(mut strategies: Vec<Strategy>) -> Self {
        strategies.sort_by_key(|s| s.id);
        let store = Self::default();
        *store.inner.strategies.write().unwrap_or_else(PoisonError::into_inner) = strategies;
        store
    }

    pub fn from_json_str(json: &str) -> StrategyResult<Self> {
        Ok(Self::new(parse_catalog(json)?))
    }

    /// Load a `[{id, text}, ...]` catalog file
    pub async fn from_json_file(path: impl AsRef<Path>) -> StrategyResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            StrategyError::InvalidCatalog(format!("cannot read {}: {e}", path.display()))
        })?;
        let store = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), count = store.len(), "Loaded strategy catalog file");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.inner
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the catalog, for seeding another store
    pub fn strategies(&self) -> Vec<Strategy> {
        self.inner
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_strategies(&self, mut strategies: Vec<Strategy>) {
        strategies.sort_by_key(|s| s.id);
        *self
            .inner
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner) = strategies;
    }

    /// While set, every operation fails with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay applied to every operation
    pub fn set_latency(&self, latency: Duration) {
        self.inner
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of `fetch_all` calls so far
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> StrategyResult<()> {
        let latency_ms = self.inner.latency_ms.load(Ordering::SeqCst);
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StrategyError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

impl StrategyCatalog for MemoryStrategyStore {
    async fn fetch_all(&self) -> StrategyResult<Vec<Strategy>> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        Ok(self.strategies())
    }

    async fn find_by_id(&self, id: StrategyId) -> StrategyResult<Option<Strategy>> {
        self.gate().await?;
        let strategies = self
            .inner
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(strategies.iter().find(|s| s.id == id).cloned())
    }
}

impl FavoritesRepository for MemoryStrategyStore {
    async fn list(&self, user: &UserId) -> StrategyResult<Vec<StrategyId>> {
        self.gate().await?;
        Ok(self
            .inner
            .favorites
            .get(user)
            .map(|ids| ids.value().clone())
            .unwrap_or_default())
    }

    async fn add(&self, user: &UserId, id: StrategyId) -> StrategyResult<()> {
        self.gate().await?;
        let mut ids = self.inner.favorites.entry(user.clone()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
        Ok(())
    }

    async fn remove(&self, user: &UserId, id: StrategyId) -> StrategyResult<()> {
        self.gate().await?;
        if let Some(mut ids) = self.inner.favorites.get_mut(user) {
            ids.retain(|f| *f != id);
        }
        Ok(())
    }
}

impl DailyRecordRepository for MemoryStrategyStore {
    async fn find(&self, user: &UserId, day: CalendarDay) -> StrategyResult<Option<DailyRecord>> {
        self.gate().await?;
        Ok(self
            .inner
            .daily
            .get(&(user.clone(), day))
            .map(|record| *record.value()))
    }

    async fn save(&self, user: &UserId, record: &DailyRecord) -> StrategyResult<()> {
        self.gate().await?;
        self.inner
            .daily
            .insert((user.clone(), record.date), *record);
        Ok(())
    }
}
