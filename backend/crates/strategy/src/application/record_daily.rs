//! Record Daily Strategy Use Case

use kernel::id::{StrategyId, UserId};
use platform::clock::Clock;
use std::sync::Arc;

use crate::domain::entities::DailyRecord;
use crate::domain::repository::{DailyRecordRepository, StrategyCatalog};
use crate::domain::value_objects::CalendarDay;
use crate::error::{StrategyError, StrategyResult};

/// Server-side daily record for the calling user
pub struct RecordDailyUseCase<R>
where
    R: StrategyCatalog + DailyRecordRepository,
{
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RecordDailyUseCase<R>
where
    R: StrategyCatalog + DailyRecordRepository,
{
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn today(&self) -> CalendarDay {
        CalendarDay::today(self.clock.as_ref())
    }

    /// Record for today (UTC); `DailyNotFound` when none was stored
    pub async fn get_today(&self, user: &UserId) -> StrategyResult<DailyRecord> {
        self.repo
            .find(user, self.today())
            .await?
            .ok_or(StrategyError::DailyNotFound)
    }

    /// Store `id` as today's strategy, replacing an earlier choice today
    pub async fn set_today(&self, user: &UserId, id: StrategyId) -> StrategyResult<DailyRecord> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(StrategyError::NotFound(Some(id)));
        }

        let record = DailyRecord::new(id, self.today());
        self.repo.save(user, &record).await?;

        tracing::info!(user_id = %user, strategy_id = %id, date = %record.date, "Daily strategy stored");
        Ok(record)
    }
}
