//! Repository Traits
//!
//! Interfaces for the strategy store. Implementations are in the infra layer.

use kernel::id::{StrategyId, UserId};

use crate::domain::entities::{DailyRecord, Strategy};
use crate::domain::value_objects::CalendarDay;
use crate::error::StrategyResult;

/// Read path of the strategy catalog
#[trait_variant::make(StrategyCatalog: Send)]
pub trait LocalStrategyCatalog {
    /// Full catalog, ascending by id
    async fn fetch_all(&self) -> StrategyResult<Vec<Strategy>>;

    /// Exact-id lookup; an unknown id is `Ok(None)`
    async fn find_by_id(&self, id: StrategyId) -> StrategyResult<Option<Strategy>>;
}

/// Per-user favorite membership (set semantics)
///
/// Remote implementations act for the user their credentials belong to and
/// may ignore `user`.
#[trait_variant::make(FavoritesRepository: Send)]
pub trait LocalFavoritesRepository {
    async fn list(&self, user: &UserId) -> StrategyResult<Vec<StrategyId>>;

    /// Adding an existing member is a no-op
    async fn add(&self, user: &UserId, id: StrategyId) -> StrategyResult<()>;

    /// Removing a non-member is a no-op
    async fn remove(&self, user: &UserId, id: StrategyId) -> StrategyResult<()>;
}

/// Server-side mirror of the daily selection, one record per (user, day)
#[trait_variant::make(DailyRecordRepository: Send)]
pub trait LocalDailyRecordRepository {
    async fn find(&self, user: &UserId, day: CalendarDay) -> StrategyResult<Option<DailyRecord>>;

    /// Insert or replace the record for `(user, record.date)`
    async fn save(&self, user: &UserId, record: &DailyRecord) -> StrategyResult<()>;
}
