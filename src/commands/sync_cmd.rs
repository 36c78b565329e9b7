//! Sync CLI commands for reconciling with the remote backend.

use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::{StoreEvents, StoreTable};
use crate::remote::{RemoteError, RemoteStore, RestRemote};
use crate::sync::SyncEngine;

/// Sync with the remote backend
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and backend reachability
    Status,
}

impl SyncCommand {
    pub async fn run(&self, pool: &SqlitePool, config: &Config) -> Result<(), SyncCommandError> {
        match &self.command {
            None => self.sync(pool, config).await,
            Some(SyncSubcommand::Status) => self.status(config).await,
        }
    }

    async fn sync(&self, pool: &SqlitePool, config: &Config) -> Result<(), SyncCommandError> {
        if !config.sync_configured() {
            return Err(SyncCommandError::NotConfigured);
        }

        let events = StoreEvents::new();
        let mut rx = events.subscribe();
        let printer = tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                let table = match event.table {
                    StoreTable::Profiles => "profile",
                    StoreTable::WeightLogs => "weight log",
                    StoreTable::DailyLogs => "daily log",
                    StoreTable::Routines => "routine",
                };
                match event.date {
                    Some(date) => println!("  ↓ {} {}", table, date),
                    None => println!("  ↓ {}", table),
                }
            }
        });

        let engine = SyncEngine::with_events(
            pool.clone(),
            RestRemote::new(&config.sync.server_url, &config.sync.api_key),
            events,
        );

        println!("Syncing with {}...", config.sync.server_url);
        println!();

        let report = engine.sync_all(&config.user_id).await;
        drop(engine);
        let _ = printer.await;
        let counts = &report.details;

        println!(
            "  profile:     {}",
            if counts.profile_synced {
                "✓ synced"
            } else {
                "- nothing to sync"
            }
        );
        println!(
            "  weight logs: ↑ {} uploaded, ↓ {} downloaded",
            counts.weight_uploaded, counts.weight_downloaded
        );
        println!(
            "  daily logs:  ↑ {} uploaded, ↓ {} downloaded",
            counts.daily_uploaded, counts.daily_downloaded
        );
        println!();

        println!("Status: {}", report.status());
        if report.success {
            Ok(())
        } else {
            Err(SyncCommandError::Failed(report.message))
        }
    }

    async fn status(&self, config: &Config) -> Result<(), SyncCommandError> {
        println!("Sync Configuration");
        println!("==================");
        println!();

        if !config.sync_configured() {
            println!("Status: Not configured");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  sync:");
            println!("    server_url: \"https://your-project.supabase.co\"");
            println!("    api_key: \"your-api-key\"");
            println!();
            println!("Or set environment variables:");
            println!("  KILOFIT_SERVER_URL");
            println!("  KILOFIT_API_KEY");
            return Ok(());
        }

        let api_key = &config.sync.api_key;
        println!("Server:  {}", config.sync.server_url);
        println!("API Key: {}...", &api_key[..api_key.len().min(8)]);
        println!();

        // Cheap reachability probe: one filtered read.
        print!("Backend status: ");
        let remote = RestRemote::new(&config.sync.server_url, api_key);
        match remote.fetch_profile(&config.user_id).await {
            Ok(_) => println!("✓ connected"),
            Err(RemoteError::Http(_)) => println!("✗ unreachable"),
            Err(e) => println!("✗ error: {}", e),
        }

        Ok(())
    }
}

/// Errors from sync commands
#[derive(Debug)]
pub enum SyncCommandError {
    NotConfigured,
    Failed(String),
}

impl std::fmt::Display for SyncCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCommandError::NotConfigured => {
                write!(
                    f,
                    "Sync is not configured. Run 'kilofit sync status' for setup instructions"
                )
            }
            SyncCommandError::Failed(message) => write!(f, "Sync failed: {}", message),
        }
    }
}

impl std::error::Error for SyncCommandError {}
