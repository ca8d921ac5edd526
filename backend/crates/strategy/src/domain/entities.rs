//! Domain Entities
//!
//! Core business entities for the strategy domain.

use kernel::id::StrategyId;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CalendarDay;

/// A single card of the deck
///
/// Immutable once created; the catalog is read-only to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: StrategyId,
    pub text: String,
}

impl Strategy {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id: StrategyId::new(id),
            text: text.into(),
        }
    }
}

/// The strategy designated as "today's" for one user or device
///
/// Serialised as `{"strategyId": 3, "date": "2024-03-01"}`. Older records
/// used `id` for the strategy field and are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    #[serde(alias = "id")]
    pub strategy_id: StrategyId,
    pub date: CalendarDay,
}

impl DailyRecord {
    pub fn new(strategy_id: StrategyId, date: CalendarDay) -> Self {
        Self { strategy_id, date }
    }

    /// Whether this record is the active one on `day`
    pub fn is_for(&self, day: CalendarDay) -> bool {
        self.date == day
    }
}
