//! Remote store contract and wire types.
//!
//! The remote backend is a hosted relational store reached over
//! authenticated HTTPS, with per-table select/insert/upsert and rows
//! scoped to a user id column. Row-level authorization is the backend's
//! job; this side only presents credentials.

mod rest;

pub use rest::RestRemote;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DailyLog, Gender, Goal, MacroSplit, MealEntry, Profile, Somatotype, WeightLog};

#[derive(Debug)]
pub enum RemoteError {
    /// Transport-level failure (connection, TLS, timeout).
    Http(String),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body could not be decoded.
    Decode(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Http(e) => write!(f, "HTTP error: {}", e),
            RemoteError::Api { status, message } => {
                write!(f, "Remote API error (status {}): {}", status, message)
            }
            RemoteError::Decode(e) => write!(f, "Failed to decode remote response: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Profile row as stored remotely. Every column except the key is
/// nullable; a row written by an older client may miss newer fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: Option<f64>,
    pub goal: Option<Goal>,
    pub start_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub weekly_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub somatotype: Option<Somatotype>,
    pub tdee: Option<i32>,
    pub macros: Option<MacroSplit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteProfile {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            email: Some(profile.email.clone()),
            name: Some(profile.name.clone()),
            gender: Some(profile.gender),
            age: Some(profile.age),
            height: Some(profile.height),
            weight: Some(profile.weight),
            activity_level: Some(profile.activity_level),
            goal: Some(profile.goal),
            start_weight: profile.start_weight,
            target_weight: profile.target_weight,
            weekly_rate: profile.weekly_rate,
            start_date: profile.start_date,
            somatotype: profile.somatotype,
            tdee: profile.tdee,
            macros: profile.macros,
            updated_at: Some(Utc::now()),
        }
    }

    /// Builds a local profile from the remote row, substituting the
    /// documented defaults for any null required field. Optional goal
    /// parameters stay absent when the remote has none.
    pub fn into_profile(self) -> Profile {
        let mut profile = Profile::new(self.id);
        profile.email = self.email.unwrap_or_default();
        profile.name = self.name.unwrap_or_default();
        profile.gender = self.gender.unwrap_or(Gender::Male);
        profile.age = self.age.unwrap_or(25);
        profile.height = self.height.unwrap_or(170.0);
        profile.weight = self.weight.unwrap_or(70.0);
        profile.activity_level = self.activity_level.unwrap_or(1.55);
        profile.goal = self.goal.unwrap_or(Goal::Maintain);
        profile.start_weight = self.start_weight;
        profile.target_weight = self.target_weight;
        profile.weekly_rate = self.weekly_rate;
        profile.start_date = self.start_date;
        profile.somatotype = self.somatotype;
        profile.tdee = self.tdee;
        profile.macros = self.macros;
        profile
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteWeightLog {
    pub user_id: String,
    pub date: NaiveDate,
    pub weight: f64,
}

impl RemoteWeightLog {
    pub fn from_log(log: &WeightLog) -> Self {
        Self {
            user_id: log.user_id.clone(),
            date: log.date,
            weight: log.weight,
        }
    }

    pub fn into_log(self) -> WeightLog {
        WeightLog::new(self.user_id, self.date, self.weight)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDailyLog {
    pub user_id: String,
    pub date: NaiveDate,
    pub calories: f64,
    pub macros: MacroSplit,
    pub meals: Vec<MealEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteDailyLog {
    pub fn from_log(log: &DailyLog) -> Self {
        Self {
            user_id: log.user_id.clone(),
            date: log.date,
            calories: log.calories,
            macros: log.macros,
            meals: log.meals.clone(),
            updated_at: Some(Utc::now()),
        }
    }

    pub fn into_log(self) -> DailyLog {
        DailyLog {
            user_id: self.user_id,
            date: self.date,
            calories: self.calories,
            macros: self.macros,
            meals: self.meals,
        }
    }
}

/// Per-table remote operations the sync engine needs. Kept as a trait so
/// the engine can be exercised against an in-memory remote in tests.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<RemoteProfile>, RemoteError>;
    async fn upsert_profile(&self, row: &RemoteProfile) -> Result<(), RemoteError>;

    async fn fetch_weight_logs(&self, user_id: &str) -> Result<Vec<RemoteWeightLog>, RemoteError>;
    async fn insert_weight_log(&self, row: &RemoteWeightLog) -> Result<(), RemoteError>;
    /// Idempotent overwrite keyed by (user_id, date).
    async fn upsert_weight_log(&self, row: &RemoteWeightLog) -> Result<(), RemoteError>;

    async fn fetch_daily_logs(&self, user_id: &str) -> Result<Vec<RemoteDailyLog>, RemoteError>;
    async fn insert_daily_log(&self, row: &RemoteDailyLog) -> Result<(), RemoteError>;
    /// Idempotent overwrite keyed by (user_id, date).
    async fn upsert_daily_log(&self, row: &RemoteDailyLog) -> Result<(), RemoteError>;
}

#[cfg(test)]
pub mod memory {
    //! In-memory remote used by the sync engine tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    pub struct MemoryRemote {
        pub profiles: Mutex<HashMap<String, RemoteProfile>>,
        pub weight_logs: Mutex<Vec<RemoteWeightLog>>,
        pub daily_logs: Mutex<Vec<RemoteDailyLog>>,
        fail: AtomicBool,
        fail_weight_logs: AtomicBool,
        delay_ms: AtomicU64,
    }

    impl MemoryRemote {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent call fail, simulating a network outage.
        pub fn set_failing(&self, failing: bool) {
            self.fail.store(failing, Ordering::SeqCst);
        }

        /// Fails only the weight log calls, leaving earlier tables to
        /// succeed, so partial-sync behavior can be observed.
        pub fn set_failing_weight_logs(&self, failing: bool) {
            self.fail_weight_logs.store(failing, Ordering::SeqCst);
        }

        /// Adds latency to every call.
        pub fn set_delay(&self, delay: Duration) {
            self.delay_ms
                .store(delay.as_millis() as u64, Ordering::SeqCst);
        }

        async fn check(&self) -> Result<(), RemoteError> {
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                Err(RemoteError::Http("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn check_weight_logs(&self) -> Result<(), RemoteError> {
            self.check().await?;
            if self.fail_weight_logs.load(Ordering::SeqCst) {
                Err(RemoteError::Http("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl RemoteStore for MemoryRemote {
        async fn fetch_profile(
            &self,
            user_id: &str,
        ) -> Result<Option<RemoteProfile>, RemoteError> {
            self.check().await?;
            Ok(self.profiles.lock().unwrap().get(user_id).cloned())
        }

        async fn upsert_profile(&self, row: &RemoteProfile) -> Result<(), RemoteError> {
            self.check().await?;
            self.profiles
                .lock()
                .unwrap()
                .insert(row.id.clone(), row.clone());
            Ok(())
        }

        async fn fetch_weight_logs(
            &self,
            user_id: &str,
        ) -> Result<Vec<RemoteWeightLog>, RemoteError> {
            self.check_weight_logs().await?;
            Ok(self
                .weight_logs
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn insert_weight_log(&self, row: &RemoteWeightLog) -> Result<(), RemoteError> {
            self.check_weight_logs().await?;
            self.weight_logs.lock().unwrap().push(row.clone());
            Ok(())
        }

        async fn upsert_weight_log(&self, row: &RemoteWeightLog) -> Result<(), RemoteError> {
            self.check_weight_logs().await?;
            let mut logs = self.weight_logs.lock().unwrap();
            logs.retain(|l| !(l.user_id == row.user_id && l.date == row.date));
            logs.push(row.clone());
            Ok(())
        }

        async fn fetch_daily_logs(
            &self,
            user_id: &str,
        ) -> Result<Vec<RemoteDailyLog>, RemoteError> {
            self.check().await?;
            Ok(self
                .daily_logs
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn insert_daily_log(&self, row: &RemoteDailyLog) -> Result<(), RemoteError> {
            self.check().await?;
            self.daily_logs.lock().unwrap().push(row.clone());
            Ok(())
        }

        async fn upsert_daily_log(&self, row: &RemoteDailyLog) -> Result<(), RemoteError> {
            self.check().await?;
            let mut logs = self.daily_logs.lock().unwrap();
            logs.retain(|l| !(l.user_id == row.user_id && l.date == row.date));
            logs.push(row.clone());
            Ok(())
        }
    }
}
