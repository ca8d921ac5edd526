//! API DTOs (Data Transfer Objects)

use kernel::id::StrategyId;
use serde::{Deserialize, Serialize};

use crate::domain::entities::DailyRecord;

/// Request for PUT /api/daily
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDailyRequest {
    pub strategy_id: StrategyId,
}

/// Response for GET/PUT /api/daily
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResponse {
    pub strategy_id: StrategyId,
    pub date: String,
}

impl From<DailyRecord> for DailyResponse {
    fn from(record: DailyRecord) -> Self {
        Self {
            strategy_id: record.strategy_id,
            date: record.date.to_string(),
        }
    }
}
