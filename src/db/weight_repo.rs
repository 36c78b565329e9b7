use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::events::{StoreEvents, StoreTable};
use crate::models::WeightLog;

pub struct WeightLogRepository {
    pool: SqlitePool,
    events: Option<StoreEvents>,
}

#[derive(sqlx::FromRow)]
struct WeightLogRow {
    id: i64,
    user_id: String,
    date: String,
    weight: f64,
}

impl WeightLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, events: None }
    }

    pub fn with_events(pool: SqlitePool, events: StoreEvents) -> Self {
        Self {
            pool,
            events: Some(events),
        }
    }

    /// Writes the entry for its date, replacing any existing weight on
    /// that date. At most one entry per (user, date).
    pub async fn upsert_for_date(&self, log: &WeightLog) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO weight_logs (user_id, date, weight)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET weight = excluded.weight
            "#,
        )
        .bind(&log.user_id)
        .bind(log.date.to_string())
        .bind(log.weight)
        .execute(&self.pool)
        .await?;

        if let Some(events) = &self.events {
            events.publish(StoreTable::WeightLogs, &log.user_id, Some(log.date));
        }

        Ok(())
    }

    /// Inserts only when the date has no entry yet. Returns whether a row
    /// was written. This is the sync/import download path: existing dated
    /// records are never overwritten.
    pub async fn insert_if_absent(&self, log: &WeightLog) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO weight_logs (user_id, date, weight) VALUES (?, ?, ?)",
        )
        .bind(&log.user_id)
        .bind(log.date.to_string())
        .bind(log.weight)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            if let Some(events) = &self.events {
                events.publish(StoreTable::WeightLogs, &log.user_id, Some(log.date));
            }
        }
        Ok(inserted)
    }

    pub async fn get_by_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<WeightLog>, sqlx::Error> {
        let row: Option<WeightLogRow> =
            sqlx::query_as("SELECT * FROM weight_logs WHERE user_id = ? AND date = ?")
                .bind(user_id)
                .bind(date.to_string())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(hydrate_weight_log))
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<WeightLog>, sqlx::Error> {
        let rows: Vec<WeightLogRow> =
            sqlx::query_as("SELECT * FROM weight_logs WHERE user_id = ? ORDER BY date")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(hydrate_weight_log).collect())
    }
}

fn hydrate_weight_log(row: WeightLogRow) -> WeightLog {
    WeightLog {
        id: Some(row.id),
        user_id: row.user_id,
        date: row.date.parse().unwrap_or_default(),
        weight: row.weight,
    }
}
