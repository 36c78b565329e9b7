use sqlx::SqlitePool;

use super::events::{StoreEvents, StoreTable};
use crate::models::{MacroSplit, Profile};

pub struct ProfileRepository {
    pool: SqlitePool,
    events: Option<StoreEvents>,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    name: String,
    gender: String,
    age: i32,
    height: f64,
    weight: f64,
    activity_level: f64,
    goal: String,
    start_weight: Option<f64>,
    target_weight: Option<f64>,
    weekly_rate: Option<f64>,
    start_date: Option<String>,
    somatotype: Option<String>,
    tdee: Option<i32>,
    macros: Option<String>,
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool, events: None }
    }

    pub fn with_events(pool: SqlitePool, events: StoreEvents) -> Self {
        Self {
            pool,
            events: Some(events),
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<Profile>, sqlx::Error> {
        let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(hydrate_profile))
    }

    pub async fn upsert(&self, profile: &Profile) -> Result<(), sqlx::Error> {
        let macros = profile
            .macros
            .as_ref()
            .and_then(|m| serde_json::to_string(m).ok());

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO profiles
                (id, email, name, gender, age, height, weight, activity_level, goal,
                 start_weight, target_weight, weekly_rate, start_date, somatotype, tdee, macros)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.gender.to_string())
        .bind(profile.age)
        .bind(profile.height)
        .bind(profile.weight)
        .bind(profile.activity_level)
        .bind(profile.goal.to_string())
        .bind(profile.start_weight)
        .bind(profile.target_weight)
        .bind(profile.weekly_rate)
        .bind(profile.start_date.map(|d| d.to_string()))
        .bind(profile.somatotype.map(|s| s.to_string()))
        .bind(profile.tdee)
        .bind(macros)
        .execute(&self.pool)
        .await?;

        if let Some(events) = &self.events {
            events.publish(StoreTable::Profiles, &profile.id, None);
        }

        Ok(())
    }
}

fn hydrate_profile(row: ProfileRow) -> Profile {
    let mut profile = Profile::new(row.id);
    profile.email = row.email;
    profile.name = row.name;
    profile.gender = row.gender.parse().unwrap_or(profile.gender);
    profile.age = row.age;
    profile.height = row.height;
    profile.weight = row.weight;
    profile.activity_level = row.activity_level;
    profile.goal = row.goal.parse().unwrap_or(profile.goal);
    profile.start_weight = row.start_weight;
    profile.target_weight = row.target_weight;
    profile.weekly_rate = row.weekly_rate;
    profile.start_date = row.start_date.and_then(|d| d.parse().ok());
    profile.somatotype = row.somatotype.and_then(|s| s.parse().ok());
    profile.tdee = row.tdee;
    profile.macros = row
        .macros
        .and_then(|m| serde_json::from_str::<MacroSplit>(&m).ok());
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{Goal, Somatotype};
    use tempfile::TempDir;

    async fn setup() -> (ProfileRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(Some(temp_dir.path().join("test.db"))).await.unwrap();
        (ProfileRepository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_get_missing_profile() {
        let (repo, _temp) = setup().await;
        assert!(repo.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get_roundtrip() {
        let (repo, _temp) = setup().await;

        let mut profile = Profile::new("user1");
        profile.email = "user@example.com".to_string();
        profile.name = "Test User".to_string();
        profile.height = 175.0;
        profile.goal = Goal::Cut;
        profile.weekly_rate = Some(-0.5);
        profile.somatotype = Some(Somatotype::Mesomorph);
        profile.recompute_derived();

        repo.upsert(&profile).await.unwrap();

        let fetched = repo.get("user1").await.unwrap().unwrap();
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing() {
        let (repo, _temp) = setup().await;

        let mut profile = Profile::new("user1");
        repo.upsert(&profile).await.unwrap();

        profile.weight = 82.5;
        profile.goal = Goal::Bulk;
        repo.upsert(&profile).await.unwrap();

        let fetched = repo.get("user1").await.unwrap().unwrap();
        assert_eq!(fetched.weight, 82.5);
        assert_eq!(fetched.goal, Goal::Bulk);
    }

    #[tokio::test]
    async fn test_upsert_publishes_event() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(Some(temp_dir.path().join("test.db"))).await.unwrap();
        let events = StoreEvents::new();
        let mut rx = events.subscribe();
        let repo = ProfileRepository::with_events(pool, events);

        repo.upsert(&Profile::new("user1")).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, StoreTable::Profiles);
        assert_eq!(event.user_id, "user1");
    }
}
