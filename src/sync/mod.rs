//! Reconciliation between the local store and the remote backend.
//!
//! One sequential pass per invocation, per-table policies:
//!
//! - profiles: local wins, always push
//! - weight logs: union by date, never overwrite an existing date
//! - daily logs: same union by date over the whole-day aggregate
//!
//! Routines are local-only and not reconciled. The engine is stateless
//! between invocations; a remote failure aborts the remaining tables and
//! surfaces as a failed report without rolling back completed ones.

mod engine;

pub use engine::{SyncEngine, SyncReport};

use std::fmt;

use crate::remote::RemoteError;

#[derive(Debug)]
pub enum SyncError {
    /// A second sync was requested while one is still running.
    InFlight,
    /// Local store failure. Unexpected; propagates rather than being
    /// absorbed into a partial result.
    Database(sqlx::Error),
    /// Remote read or write failure. Terminal for the invocation.
    Remote(RemoteError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::InFlight => write!(f, "A sync is already in progress"),
            SyncError::Database(e) => write!(f, "Local store error: {}", e),
            SyncError::Remote(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::InFlight => None,
            SyncError::Database(e) => Some(e),
            SyncError::Remote(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for SyncError {
    fn from(e: sqlx::Error) -> Self {
        SyncError::Database(e)
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        SyncError::Remote(e)
    }
}

/// UI-facing sync state, driven by the caller from the engine's return
/// value. The engine itself holds no state between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Success,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => write!(f, "idle"),
            SyncStatus::Syncing => write!(f, "syncing"),
            SyncStatus::Success => write!(f, "synced"),
            SyncStatus::Error => write!(f, "sync failed"),
        }
    }
}

/// Per-table record counts for one sync invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub profile_synced: bool,
    pub weight_uploaded: u32,
    pub weight_downloaded: u32,
    pub daily_uploaded: u32,
    pub daily_downloaded: u32,
}
