//! PostgreSQL Repository Implementations

use chrono::NaiveDate;
use kernel::id::{StrategyId, UserId};
use sqlx::PgPool;

use crate::domain::entities::{DailyRecord, Strategy};
use crate::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use crate::domain::value_objects::CalendarDay;
use crate::error::{StrategyError, StrategyResult};

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgStrategyRepository {
    pool: PgPool,
}

impl PgStrategyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> StrategyResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM strategies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Upsert the whole catalog in one transaction, then verify every id
    /// landed
    pub async fn import(&self, strategies: &[Strategy]) -> StrategyResult<usize> {
        let mut tx = self.pool.begin().await?;

        for strategy in strategies {
            sqlx::query(
                r#"
                INSERT INTO strategies (id, text)
                VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE
                    SET text = EXCLUDED.text,
                        updated_at = NOW()
                "#,
            )
            .bind(strategy.id.value())
            .bind(&strategy.text)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let ids: Vec<i64> = strategies.iter().map(|s| s.id.value()).collect();
        let stored = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM strategies WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_one(&self.pool)
        .await?;

        if stored != strategies.len() as i64 {
            return Err(StrategyError::ImportMismatch {
                expected: strategies.len(),
                stored,
            });
        }

        tracing::info!(count = strategies.len(), "Strategy catalog imported");
        Ok(strategies.len())
    }

    /// Import only into an empty catalog; returns the imported count
    pub async fn seed_if_empty(&self, strategies: &[Strategy]) -> StrategyResult<Option<usize>> {
        let existing = self.count().await?;
        if existing > 0 {
            tracing::info!(existing, "Strategy catalog already populated, skipping seed");
            return Ok(None);
        }
        self.import(strategies).await.map(Some)
    }
}

impl StrategyCatalog for PgStrategyRepository {
    async fn fetch_all(&self) -> StrategyResult<Vec<Strategy>> {
        let rows = sqlx::query_as::<_, StrategyRow>("SELECT id, text FROM strategies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StrategyRow::into_strategy).collect())
    }

    async fn find_by_id(&self, id: StrategyId) -> StrategyResult<Option<Strategy>> {
        let row = sqlx::query_as::<_, StrategyRow>("SELECT id, text FROM strategies WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StrategyRow::into_strategy))
    }
}

impl FavoritesRepository for PgStrategyRepository {
    async fn list(&self, user: &UserId) -> StrategyResult<Vec<StrategyId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT strategy_id
            FROM user_favorites
            WHERE user_id = $1
            ORDER BY added_at, strategy_id
            "#,
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(StrategyId::new).collect())
    }

    async fn add(&self, user: &UserId, id: StrategyId) -> StrategyResult<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, strategy_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, strategy_id) DO NOTHING
            "#,
        )
        .bind(user.as_str())
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                StrategyError::NotFound(Some(id))
            }
            _ => StrategyError::Database(e),
        })?
        .rows_affected();

        tracing::debug!(user_id = %user, strategy_id = %id, inserted, "Favorite stored");
        Ok(())
    }

    async fn remove(&self, user: &UserId, id: StrategyId) -> StrategyResult<()> {
        sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND strategy_id = $2")
            .bind(user.as_str())
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

impl DailyRecordRepository for PgStrategyRepository {
    async fn find(&self, user: &UserId, day: CalendarDay) -> StrategyResult<Option<DailyRecord>> {
        let row = sqlx::query_as::<_, DailyRow>(
            "SELECT strategy_id, day FROM daily_strategies WHERE user_id = $1 AND day = $2",
        )
        .bind(user.as_str())
        .bind(day.as_naive())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DailyRow::into_record))
    }

    async fn save(&self, user: &UserId, record: &DailyRecord) -> StrategyResult<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_strategies (user_id, day, strategy_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, day) DO UPDATE
                SET strategy_id = EXCLUDED.strategy_id,
                    created_at = NOW()
            "#,
        )
        .bind(user.as_str())
        .bind(record.date.as_naive())
        .bind(record.strategy_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct StrategyRow {
    id: i64,
    text: String,
}

impl StrategyRow {
    fn into_strategy(self) -> Strategy {
        Strategy::new(self.id, self.text)
    }
}

#[derive(sqlx::FromRow)]
struct DailyRow {
    strategy_id: i64,
    day: NaiveDate,
}

impl DailyRow {
    fn into_record(self) -> DailyRecord {
        DailyRecord::new(StrategyId::new(self.strategy_id), CalendarDay::new(self.day))
    }
}
