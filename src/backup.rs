//! Manual backup and restore of the local store.
//!
//! Snapshot format: versioned JSON, version `"1.0"`. Import mirrors the
//! sync engine's merge philosophy for logs (additive, existing dates
//! untouched) but always takes the imported profile, matching the
//! profile merge policy.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{DailyLogRepository, ProfileRepository, RoutineRepository, WeightLogRepository};
use crate::models::{DailyLog, MacroSplit, Profile, RoutineExercise, WeightLog};

const EXPORT_VERSION: &str = "1.0";

#[derive(Debug)]
pub enum BackupError {
    Io(std::io::Error),
    /// File exists but is not a snapshot this version understands.
    Format(String),
    /// Snapshot parsed but carries a version this build cannot import.
    UnsupportedVersion(String),
    Database(sqlx::Error),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::Io(e) => write!(f, "File error: {}", e),
            BackupError::Format(e) => write!(f, "Invalid backup file: {}", e),
            BackupError::UnsupportedVersion(v) => {
                write!(f, "Unsupported backup version: {}", v)
            }
            BackupError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for BackupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackupError::Io(e) => Some(e),
            BackupError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(e: std::io::Error) -> Self {
        BackupError::Io(e)
    }
}

impl From<sqlx::Error> for BackupError {
    fn from(e: sqlx::Error) -> Self {
        BackupError::Database(e)
    }
}

/// Top-level snapshot document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub version: String,
    pub profile: Option<Profile>,
    pub weight_logs: Vec<WeightEntry>,
    pub daily_logs: Vec<DayEntry>,
    pub routines: Vec<RoutineEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Day summary only; the full meal list is not part of the snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub calories: f64,
    pub macros: MacroSplit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoutineEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub exercises: Vec<RoutineExercise>,
}

/// Counts of records the import actually wrote. Skipped dates are the
/// difference between the snapshot and these.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub profile_imported: bool,
    pub weight_imported: u32,
    pub daily_imported: u32,
}

/// Writes a pretty-printed snapshot of everything the user owns to `path`.
pub async fn export(pool: &SqlitePool, user_id: &str, path: &Path) -> Result<(), BackupError> {
    let profile = ProfileRepository::new(pool.clone()).get(user_id).await?;
    let weight_logs = WeightLogRepository::new(pool.clone()).list(user_id).await?;
    let daily_logs = DailyLogRepository::new(pool.clone()).list(user_id).await?;
    let routines = RoutineRepository::new(pool.clone()).list().await?;

    let data = ExportData {
        version: EXPORT_VERSION.to_string(),
        profile,
        weight_logs: weight_logs
            .iter()
            .map(|l| WeightEntry {
                date: l.date,
                weight: l.weight,
            })
            .collect(),
        daily_logs: daily_logs
            .iter()
            .map(|l| DayEntry {
                date: l.date,
                calories: l.calories,
                macros: l.macros,
            })
            .collect(),
        routines: routines
            .into_iter()
            .map(|r| RoutineEntry {
                id: r.id,
                name: r.name,
                category: r.category,
                exercises: r.exercises,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&data)
        .map_err(|e| BackupError::Format(e.to_string()))?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "exported backup");
    Ok(())
}

/// Reads a snapshot from `path` and merges it into the local store.
///
/// Version is checked before anything is written. Weight and daily logs
/// are additive only; dates already present locally keep their local
/// values. The imported profile replaces the local one. Routines in the
/// snapshot are carried for inspection but not restored.
pub async fn import(
    pool: &SqlitePool,
    user_id: &str,
    path: &Path,
) -> Result<ImportSummary, BackupError> {
    let contents = std::fs::read_to_string(path)?;
    let data: ExportData =
        serde_json::from_str(&contents).map_err(|e| BackupError::Format(e.to_string()))?;

    if data.version != EXPORT_VERSION {
        return Err(BackupError::UnsupportedVersion(data.version));
    }

    let mut summary = ImportSummary::default();

    if let Some(mut profile) = data.profile {
        profile.id = user_id.to_string();
        ProfileRepository::new(pool.clone()).upsert(&profile).await?;
        summary.profile_imported = true;
    }

    let weight_repo = WeightLogRepository::new(pool.clone());
    for entry in &data.weight_logs {
        let inserted = weight_repo
            .insert_if_absent(&WeightLog::new(user_id, entry.date, entry.weight))
            .await?;
        if inserted {
            summary.weight_imported += 1;
        }
    }

    // Snapshot days carry the summary only, so restored days come back
    // with their totals and an empty meal list.
    let daily_repo = DailyLogRepository::new(pool.clone());
    for entry in &data.daily_logs {
        let mut log = DailyLog::new(user_id, entry.date);
        log.calories = entry.calories;
        log.macros = entry.macros;
        let inserted = daily_repo.insert_if_absent(&log).await?;
        if inserted {
            summary.daily_imported += 1;
        }
    }

    tracing::info!(
        path = %path.display(),
        weight = summary.weight_imported,
        daily = summary.daily_imported,
        "imported backup"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{Goal, MealEntry, MealSlot};
    use tempfile::TempDir;

    async fn setup() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(Some(temp_dir.path().join("test.db"))).await.unwrap();
        (pool, temp_dir)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_export_import_roundtrip() {
        let (pool, temp) = setup().await;
        let backup_path = temp.path().join("backup.json");

        let mut profile = Profile::new("user1");
        profile.goal = Goal::Cut;
        profile.weekly_rate = Some(-0.5);
        profile.recompute_derived();
        ProfileRepository::new(pool.clone()).upsert(&profile).await.unwrap();

        let weight_repo = WeightLogRepository::new(pool.clone());
        weight_repo
            .upsert_for_date(&WeightLog::new("user1", date("2025-03-01"), 80.0))
            .await
            .unwrap();

        let daily_repo = DailyLogRepository::new(pool.clone());
        daily_repo
            .add_meal(
                "user1",
                date("2025-03-01"),
                MealEntry::new(
                    "food-1",
                    "Eggs",
                    MealSlot::Breakfast,
                    2.0,
                    "unit",
                    100.0,
                    155.0,
                    MacroSplit::new(13.0, 1.1, 11.0),
                ),
            )
            .await
            .unwrap();

        export(&pool, "user1", &backup_path).await.unwrap();

        // Restore into a fresh store.
        let (pool2, _temp2) = setup().await;
        let summary = import(&pool2, "user1", &backup_path).await.unwrap();

        assert!(summary.profile_imported);
        assert_eq!(summary.weight_imported, 1);
        assert_eq!(summary.daily_imported, 1);

        let restored = ProfileRepository::new(pool2.clone())
            .get("user1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restored.goal, Goal::Cut);
        assert_eq!(restored.macros, profile.macros);

        // Day summary restored without meals.
        let day = DailyLogRepository::new(pool2.clone())
            .get("user1", date("2025-03-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(day.calories, 155.0);
        assert!(day.meals.is_empty());
    }

    #[tokio::test]
    async fn test_import_is_additive_only() {
        let (pool, temp) = setup().await;
        let backup_path = temp.path().join("backup.json");

        let weight_repo = WeightLogRepository::new(pool.clone());
        weight_repo
            .upsert_for_date(&WeightLog::new("user1", date("2025-03-01"), 80.0))
            .await
            .unwrap();
        export(&pool, "user1", &backup_path).await.unwrap();

        // Local value changes after the snapshot was taken.
        weight_repo
            .upsert_for_date(&WeightLog::new("user1", date("2025-03-01"), 78.0))
            .await
            .unwrap();

        let summary = import(&pool, "user1", &backup_path).await.unwrap();
        assert_eq!(summary.weight_imported, 0);

        let log = weight_repo
            .get_by_date("user1", date("2025-03-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(log.weight, 78.0);
    }

    #[tokio::test]
    async fn test_import_rejects_unsupported_version() {
        let (pool, temp) = setup().await;
        let backup_path = temp.path().join("backup.json");

        std::fs::write(
            &backup_path,
            r#"{"version":"2.0","profile":null,"weight_logs":[{"date":"2025-03-01","weight":80.0}],"daily_logs":[],"routines":[]}"#,
        )
        .unwrap();

        let result = import(&pool, "user1", &backup_path).await;
        assert!(matches!(result, Err(BackupError::UnsupportedVersion(v)) if v == "2.0"));

        // Nothing written before the version check failed.
        let logs = WeightLogRepository::new(pool.clone())
            .list("user1")
            .await
            .unwrap();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_file() {
        let (pool, temp) = setup().await;
        let backup_path = temp.path().join("backup.json");
        std::fs::write(&backup_path, "not json").unwrap();

        let result = import(&pool, "user1", &backup_path).await;
        assert!(matches!(result, Err(BackupError::Format(_))));
    }
}
