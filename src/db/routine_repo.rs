use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::events::{StoreEvents, StoreTable};
use crate::models::{Difficulty, Routine};

pub struct RoutineRepository {
    pool: SqlitePool,
    events: Option<StoreEvents>,
}

#[derive(sqlx::FromRow)]
struct RoutineRow {
    id: String,
    name: String,
    description: String,
    category: String,
    difficulty: String,
    estimated_minutes: i32,
    rest_seconds: i32,
    exercises: String,
    created_at: String,
    updated_at: String,
}

impl RoutineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, events: None }
    }

    pub fn with_events(pool: SqlitePool, events: StoreEvents) -> Self {
        Self {
            pool,
            events: Some(events),
        }
    }

    pub async fn create(&self, routine: &Routine) -> Result<(), sqlx::Error> {
        self.write(routine, "INSERT").await
    }

    /// Writes the routine only when its id is not already present. Used
    /// when seeding the somatotype starter routine during profile setup.
    pub async fn create_if_absent(&self, routine: &Routine) -> Result<bool, sqlx::Error> {
        if self.get_by_id(&routine.id).await?.is_some() {
            return Ok(false);
        }
        self.create(routine).await?;
        Ok(true)
    }

    pub async fn update(&self, routine: &Routine) -> Result<(), sqlx::Error> {
        self.write(routine, "INSERT OR REPLACE").await
    }

    async fn write(&self, routine: &Routine, verb: &str) -> Result<(), sqlx::Error> {
        let exercises =
            serde_json::to_string(&routine.exercises).unwrap_or_else(|_| "[]".to_string());

        let sql = format!(
            r#"
            {} INTO routines
                (id, name, description, category, difficulty, estimated_minutes,
                 rest_seconds, exercises, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            verb
        );

        sqlx::query(&sql)
            .bind(&routine.id)
            .bind(&routine.name)
            .bind(&routine.description)
            .bind(&routine.category)
            .bind(routine.difficulty.to_string())
            .bind(routine.estimated_minutes)
            .bind(routine.rest_seconds)
            .bind(exercises)
            .bind(routine.created_at.to_rfc3339())
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        if let Some(events) = &self.events {
            events.publish(StoreTable::Routines, &routine.id, None);
        }

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Routine>, sqlx::Error> {
        let row: Option<RoutineRow> = sqlx::query_as("SELECT * FROM routines WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(hydrate_routine))
    }

    pub async fn list(&self) -> Result<Vec<Routine>, sqlx::Error> {
        let rows: Vec<RoutineRow> = sqlx::query_as("SELECT * FROM routines ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(hydrate_routine).collect())
    }

    pub async fn delete(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM routines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if let Some(events) = &self.events {
            events.publish(StoreTable::Routines, id, None);
        }

        Ok(())
    }
}

fn hydrate_routine(row: RoutineRow) -> Routine {
    Routine {
        id: row.id,
        name: row.name,
        description: row.description,
        category: row.category,
        difficulty: row.difficulty.parse().unwrap_or(Difficulty::Intermediate),
        estimated_minutes: row.estimated_minutes,
        rest_seconds: row.rest_seconds,
        exercises: serde_json::from_str(&row.exercises).unwrap_or_default(),
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{RoutineExercise, Somatotype};
    use tempfile::TempDir;

    async fn setup() -> (RoutineRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(Some(temp_dir.path().join("test.db"))).await.unwrap();
        (RoutineRepository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_create_and_get_routine() {
        let (repo, _temp) = setup().await;

        let routine = Routine::new("Leg Day")
            .with_description("Squat focus")
            .with_exercises(vec![
                RoutineExercise::new("back-squat", 5, 5),
                RoutineExercise::new("leg-press", 3, 10),
            ]);
        repo.create(&routine).await.unwrap();

        let fetched = repo.get_by_id(&routine.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Leg Day");
        assert_eq!(fetched.exercises.len(), 2);
        assert_eq!(fetched.exercises[0].exercise_id, "back-squat");
    }

    #[tokio::test]
    async fn test_create_if_absent_keeps_existing() {
        let (repo, _temp) = setup().await;

        let seeded = repo
            .create_if_absent(&Routine::default_for(Somatotype::Ectomorph))
            .await
            .unwrap();
        assert!(seeded);

        let mut edited = repo.get_by_id("ecto-push-a").await.unwrap().unwrap();
        edited.name = "My Push Day".to_string();
        repo.update(&edited).await.unwrap();

        let seeded_again = repo
            .create_if_absent(&Routine::default_for(Somatotype::Ectomorph))
            .await
            .unwrap();
        assert!(!seeded_again);

        let fetched = repo.get_by_id("ecto-push-a").await.unwrap().unwrap();
        assert_eq!(fetched.name, "My Push Day");
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let (repo, _temp) = setup().await;

        repo.create(&Routine::new("Pull Day")).await.unwrap();
        repo.create(&Routine::new("Leg Day")).await.unwrap();

        let routines = repo.list().await.unwrap();
        assert_eq!(routines.len(), 2);
        assert_eq!(routines[0].name, "Leg Day");
        assert_eq!(routines[1].name, "Pull Day");
    }

    #[tokio::test]
    async fn test_delete_routine() {
        let (repo, _temp) = setup().await;

        let routine = Routine::new("Temporary");
        repo.create(&routine).await.unwrap();
        repo.delete(&routine.id).await.unwrap();

        assert!(repo.get_by_id(&routine.id).await.unwrap().is_none());
    }
}
