use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::events::{StoreEvents, StoreTable};
use crate::models::{DailyLog, MacroSplit, MealEntry};

pub struct DailyLogRepository {
    pool: SqlitePool,
    events: Option<StoreEvents>,
}

#[derive(sqlx::FromRow)]
struct DailyLogRow {
    user_id: String,
    date: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    meals: String,
}

impl DailyLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, events: None }
    }

    pub fn with_events(pool: SqlitePool, events: StoreEvents) -> Self {
        Self {
            pool,
            events: Some(events),
        }
    }

    pub async fn get(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyLog>, sqlx::Error> {
        let row: Option<DailyLogRow> =
            sqlx::query_as("SELECT * FROM daily_logs WHERE user_id = ? AND date = ?")
                .bind(user_id)
                .bind(date.to_string())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(hydrate_daily_log))
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<DailyLog>, sqlx::Error> {
        let rows: Vec<DailyLogRow> =
            sqlx::query_as("SELECT * FROM daily_logs WHERE user_id = ? ORDER BY date")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(hydrate_daily_log).collect())
    }

    /// Writes the whole day aggregate (totals plus meal list) in a single
    /// statement, replacing any existing row for that date.
    pub async fn upsert(&self, log: &DailyLog) -> Result<(), sqlx::Error> {
        let meals = serde_json::to_string(&log.meals).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO daily_logs (user_id, date, calories, protein, carbs, fats, meals)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.user_id)
        .bind(log.date.to_string())
        .bind(log.calories)
        .bind(log.macros.protein)
        .bind(log.macros.carbs)
        .bind(log.macros.fats)
        .bind(meals)
        .execute(&self.pool)
        .await?;

        if let Some(events) = &self.events {
            events.publish(StoreTable::DailyLogs, &log.user_id, Some(log.date));
        }

        Ok(())
    }

    /// Inserts only when the date has no entry yet. Returns whether a row
    /// was written. Sync/import download path.
    pub async fn insert_if_absent(&self, log: &DailyLog) -> Result<bool, sqlx::Error> {
        let meals = serde_json::to_string(&log.meals).unwrap_or_else(|_| "[]".to_string());

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO daily_logs (user_id, date, calories, protein, carbs, fats, meals)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.user_id)
        .bind(log.date.to_string())
        .bind(log.calories)
        .bind(log.macros.protein)
        .bind(log.macros.carbs)
        .bind(log.macros.fats)
        .bind(meals)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            if let Some(events) = &self.events {
                events.publish(StoreTable::DailyLogs, &log.user_id, Some(log.date));
            }
        }
        Ok(inserted)
    }

    /// Appends a meal entry to the day, creating the day lazily on first
    /// use. Totals and the meal list land in the same write, so the
    /// totals-equal-sum invariant holds at every point a reader can see.
    pub async fn add_meal(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: MealEntry,
    ) -> Result<DailyLog, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let row: Option<DailyLogRow> =
            sqlx::query_as("SELECT * FROM daily_logs WHERE user_id = ? AND date = ?")
                .bind(user_id)
                .bind(date.to_string())
                .fetch_optional(&mut *tx)
                .await?;

        let mut log = row
            .map(hydrate_daily_log)
            .unwrap_or_else(|| DailyLog::new(user_id, date));
        log.add_meal(entry);

        let meals = serde_json::to_string(&log.meals).unwrap_or_else(|_| "[]".to_string());
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO daily_logs (user_id, date, calories, protein, carbs, fats, meals)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.user_id)
        .bind(log.date.to_string())
        .bind(log.calories)
        .bind(log.macros.protein)
        .bind(log.macros.carbs)
        .bind(log.macros.fats)
        .bind(meals)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if let Some(events) = &self.events {
            events.publish(StoreTable::DailyLogs, user_id, Some(date));
        }

        Ok(log)
    }
}

fn hydrate_daily_log(row: DailyLogRow) -> DailyLog {
    DailyLog {
        user_id: row.user_id,
        date: row.date.parse().unwrap_or_default(),
        calories: row.calories,
        macros: MacroSplit::new(row.protein, row.carbs, row.fats),
        meals: serde_json::from_str(&row.meals).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::MealSlot;
    use tempfile::TempDir;

    async fn setup() -> (DailyLogRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(Some(temp_dir.path().join("test.db"))).await.unwrap();
        (DailyLogRepository::new(pool), temp_dir)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn entry(name: &str, calories: f64, protein: f64) -> MealEntry {
        MealEntry::new(
            "food-1",
            name,
            MealSlot::Dinner,
            1.0,
            "serving",
            150.0,
            calories,
            MacroSplit::new(protein, 10.0, 5.0),
        )
    }

    #[tokio::test]
    async fn test_add_meal_creates_day_lazily() {
        let (repo, _temp) = setup().await;
        let d = date("2025-03-05");

        assert!(repo.get("user1", d).await.unwrap().is_none());

        let log = repo
            .add_meal("user1", d, entry("Chicken", 250.0, 30.0))
            .await
            .unwrap();
        assert_eq!(log.meals.len(), 1);
        assert_eq!(log.calories, 250.0);

        let fetched = repo.get("user1", d).await.unwrap().unwrap();
        assert_eq!(fetched, log);
    }

    #[tokio::test]
    async fn test_add_meal_keeps_totals_consistent() {
        let (repo, _temp) = setup().await;
        let d = date("2025-03-05");

        repo.add_meal("user1", d, entry("Eggs", 155.0, 13.0))
            .await
            .unwrap();
        repo.add_meal("user1", d, entry("Rice", 130.0, 2.7))
            .await
            .unwrap();
        let log = repo
            .add_meal("user1", d, entry("Beans", 120.0, 8.0))
            .await
            .unwrap();

        let calories: f64 = log.meals.iter().map(|m| m.calories).sum();
        let protein: f64 = log.meals.iter().map(|m| m.macros.protein).sum();
        assert_eq!(log.calories, calories);
        assert_eq!(log.macros.protein, protein);
        assert_eq!(log.meals.len(), 3);
    }

    #[tokio::test]
    async fn test_insert_if_absent_preserves_existing_day() {
        let (repo, _temp) = setup().await;
        let d = date("2025-03-05");

        repo.add_meal("user1", d, entry("Eggs", 155.0, 13.0))
            .await
            .unwrap();

        let mut incoming = DailyLog::new("user1", d);
        incoming.add_meal(entry("Other", 500.0, 20.0));
        let inserted = repo.insert_if_absent(&incoming).await.unwrap();
        assert!(!inserted);

        let existing = repo.get("user1", d).await.unwrap().unwrap();
        assert_eq!(existing.calories, 155.0);
        assert_eq!(existing.meals[0].food_name, "Eggs");
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_day() {
        let (repo, _temp) = setup().await;
        let d = date("2025-03-05");

        repo.add_meal("user1", d, entry("Eggs", 155.0, 13.0))
            .await
            .unwrap();

        let replacement = DailyLog::new("user1", d);
        repo.upsert(&replacement).await.unwrap();

        let fetched = repo.get("user1", d).await.unwrap().unwrap();
        assert!(fetched.meals.is_empty());
        assert_eq!(fetched.calories, 0.0);
    }

    #[tokio::test]
    async fn test_list_scoped_and_ordered() {
        let (repo, _temp) = setup().await;

        repo.add_meal("user1", date("2025-03-06"), entry("B", 100.0, 5.0))
            .await
            .unwrap();
        repo.add_meal("user1", date("2025-03-04"), entry("A", 100.0, 5.0))
            .await
            .unwrap();
        repo.add_meal("user2", date("2025-03-05"), entry("C", 100.0, 5.0))
            .await
            .unwrap();

        let logs = repo.list("user1").await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].date, date("2025-03-04"));
        assert_eq!(logs[1].date, date("2025-03-06"));
    }

    #[tokio::test]
    async fn test_meal_entries_survive_json_column() {
        let (repo, _temp) = setup().await;
        let d = date("2025-03-05");

        let e = entry("Salmon", 367.0, 39.3);
        let id = e.id;
        repo.add_meal("user1", d, e).await.unwrap();

        let fetched = repo.get("user1", d).await.unwrap().unwrap();
        assert_eq!(fetched.meals[0].id, id);
        assert_eq!(fetched.meals[0].slot, MealSlot::Dinner);
        assert_eq!(fetched.meals[0].grams, 150.0);
    }
}
