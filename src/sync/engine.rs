use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::{SyncCounts, SyncError, SyncStatus};
use crate::db::{DailyLogRepository, ProfileRepository, StoreEvents, WeightLogRepository};
use crate::models::DailyLog;
use crate::remote::{RemoteDailyLog, RemoteProfile, RemoteStore, RemoteWeightLog};

/// Outcome of one sync invocation. Counts reflect work completed before
/// any failure; nothing is rolled back on a partial sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub success: bool,
    pub message: String,
    pub details: SyncCounts,
}

impl SyncReport {
    fn completed(details: SyncCounts) -> Self {
        Self {
            success: true,
            message: "Sync complete".to_string(),
            details,
        }
    }

    fn failed(error: &SyncError, details: SyncCounts) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            details,
        }
    }

    /// Terminal status for a caller driving a status line.
    pub fn status(&self) -> SyncStatus {
        if self.success {
            SyncStatus::Success
        } else {
            SyncStatus::Error
        }
    }
}

/// Reconciles the local store with a remote store for one user.
///
/// One sequential pass per call. The in-flight guard rejects overlapping
/// invocations: the merge loops are not transactional, and two
/// interleaved passes over the same tables would double-count uploads.
pub struct SyncEngine<R> {
    pool: SqlitePool,
    remote: R,
    events: Option<StoreEvents>,
    in_flight: AtomicBool,
}

impl<R: RemoteStore> SyncEngine<R> {
    pub fn new(pool: SqlitePool, remote: R) -> Self {
        Self {
            pool,
            remote,
            events: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Downloaded records are announced on `events` as they land.
    pub fn with_events(pool: SqlitePool, remote: R, events: StoreEvents) -> Self {
        Self {
            pool,
            remote,
            events: Some(events),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn profile_repo(&self) -> ProfileRepository {
        match &self.events {
            Some(events) => ProfileRepository::with_events(self.pool.clone(), events.clone()),
            None => ProfileRepository::new(self.pool.clone()),
        }
    }

    fn weight_repo(&self) -> WeightLogRepository {
        match &self.events {
            Some(events) => WeightLogRepository::with_events(self.pool.clone(), events.clone()),
            None => WeightLogRepository::new(self.pool.clone()),
        }
    }

    fn daily_log_repo(&self) -> DailyLogRepository {
        match &self.events {
            Some(events) => DailyLogRepository::with_events(self.pool.clone(), events.clone()),
            None => DailyLogRepository::new(self.pool.clone()),
        }
    }

    /// Runs the full reconciliation for `user_id` and reports what
    /// happened. Remote failures come back as a failed report rather
    /// than an `Err`; tables already synced stay synced.
    pub async fn sync_all(&self, user_id: &str) -> SyncReport {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SyncReport::failed(&SyncError::InFlight, SyncCounts::default());
        }

        let report = self.run(user_id).await;
        self.in_flight.store(false, Ordering::SeqCst);
        report
    }

    async fn run(&self, user_id: &str) -> SyncReport {
        let mut details = SyncCounts::default();
        tracing::info!(user_id, "starting sync");

        match self.sync_profile(user_id).await {
            Ok(synced) => details.profile_synced = synced,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "profile sync failed");
                return SyncReport::failed(&e, details);
            }
        }

        match self.sync_weight_logs(user_id).await {
            Ok((uploaded, downloaded)) => {
                details.weight_uploaded = uploaded;
                details.weight_downloaded = downloaded;
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "weight log sync failed");
                return SyncReport::failed(&e, details);
            }
        }

        match self.sync_daily_logs(user_id).await {
            Ok((uploaded, downloaded)) => {
                details.daily_uploaded = uploaded;
                details.daily_downloaded = downloaded;
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "daily log sync failed");
                return SyncReport::failed(&e, details);
            }
        }

        tracing::info!(user_id, ?details, "sync complete");
        SyncReport::completed(details)
    }

    /// Profile policy: local wins, always push.
    ///
    /// A remote edit made from a second device with no matching local
    /// copy gets overwritten on the next push from this device. That is
    /// the documented behavior for this singleton, not an accident.
    async fn sync_profile(&self, user_id: &str) -> Result<bool, SyncError> {
        let repo = self.profile_repo();
        let local = repo.get(user_id).await?;
        let remote = self.remote.fetch_profile(user_id).await?;

        match (local, remote) {
            (Some(local), _) => {
                // Local-only or both: push local over remote.
                self.remote
                    .upsert_profile(&RemoteProfile::from_profile(&local))
                    .await?;
                tracing::debug!(user_id, "pushed local profile");
                Ok(true)
            }
            (None, Some(remote)) => {
                repo.upsert(&remote.into_profile()).await?;
                tracing::debug!(user_id, "downloaded remote profile");
                Ok(true)
            }
            (None, None) => Ok(false),
        }
    }

    /// Weight log policy: union by date, no overwrite of existing dates.
    ///
    /// Both snapshots are taken once up front; the upload pass completes
    /// before the download pass starts. Running this twice with no new
    /// writes in between produces zero additional writes.
    async fn sync_weight_logs(&self, user_id: &str) -> Result<(u32, u32), SyncError> {
        let repo = self.weight_repo();
        let local_logs = repo.list(user_id).await?;
        let remote_logs = self.remote.fetch_weight_logs(user_id).await?;

        let local_dates: HashSet<NaiveDate> = local_logs.iter().map(|l| l.date).collect();
        let remote_dates: HashSet<NaiveDate> = remote_logs.iter().map(|l| l.date).collect();

        let mut uploaded = 0;
        for local in &local_logs {
            if !remote_dates.contains(&local.date) {
                self.remote
                    .insert_weight_log(&RemoteWeightLog::from_log(local))
                    .await?;
                uploaded += 1;
            }
        }

        let mut downloaded = 0;
        for remote in remote_logs {
            if !local_dates.contains(&remote.date) {
                repo.insert_if_absent(&remote.into_log()).await?;
                downloaded += 1;
            }
        }

        tracing::debug!(user_id, uploaded, downloaded, "weight logs merged");
        Ok((uploaded, downloaded))
    }

    /// Daily log policy: same union by date, over the whole-day
    /// aggregate. A date present on both sides is left untouched even
    /// when the meal lists differ; reconciling divergent same-day edits
    /// is an unresolved product decision, not something to guess at here.
    async fn sync_daily_logs(&self, user_id: &str) -> Result<(u32, u32), SyncError> {
        let repo = self.daily_log_repo();
        let local_logs = repo.list(user_id).await?;
        let remote_logs = self.remote.fetch_daily_logs(user_id).await?;

        let local_dates: HashSet<NaiveDate> = local_logs.iter().map(|l| l.date).collect();
        let remote_dates: HashSet<NaiveDate> = remote_logs.iter().map(|l| l.date).collect();

        let mut uploaded = 0;
        for local in &local_logs {
            if !remote_dates.contains(&local.date) {
                self.remote
                    .insert_daily_log(&RemoteDailyLog::from_log(local))
                    .await?;
                uploaded += 1;
            }
        }

        let mut downloaded = 0;
        for remote in remote_logs {
            if !local_dates.contains(&remote.date) {
                repo.insert_if_absent(&remote.into_log()).await?;
                downloaded += 1;
            }
        }

        tracing::debug!(user_id, uploaded, downloaded, "daily logs merged");
        Ok((uploaded, downloaded))
    }

    /// Pushes a single weight entry to the remote right away, bypassing
    /// the reconciliation loop. Remote-only: the caller has already
    /// written the local store.
    pub async fn push_weight_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
        weight: f64,
    ) -> Result<(), SyncError> {
        self.remote
            .upsert_weight_log(&RemoteWeightLog {
                user_id: user_id.to_string(),
                date,
                weight,
            })
            .await?;
        Ok(())
    }

    /// Pushes a single day's log to the remote right away. Remote-only,
    /// idempotent overwrite keyed by (user_id, date).
    pub async fn push_daily_log(&self, log: &DailyLog) -> Result<(), SyncError> {
        self.remote
            .upsert_daily_log(&RemoteDailyLog::from_log(log))
            .await?;
        Ok(())
    }
}
