use std::path::PathBuf;

use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use crate::backup;
use crate::config::Config;

#[derive(Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    pub command: BackupSubcommand,
}

#[derive(Subcommand)]
pub enum BackupSubcommand {
    /// Write a JSON snapshot of all local data
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Merge a snapshot into the local store (additive for logs)
    Import {
        /// Snapshot file
        path: PathBuf,
    },
}

impl BackupCommand {
    pub async fn run(
        &self,
        pool: &SqlitePool,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            BackupSubcommand::Export { path } => {
                backup::export(pool, &config.user_id, path).await?;
                println!("Exported to {}", path.display());
                Ok(())
            }

            BackupSubcommand::Import { path } => {
                let summary = backup::import(pool, &config.user_id, path).await?;
                println!("Imported from {}", path.display());
                if summary.profile_imported {
                    println!("  profile: replaced");
                }
                println!("  weight logs: {} added", summary.weight_imported);
                println!("  daily logs:  {} added", summary.daily_imported);
                println!("Existing dates were left untouched.");
                Ok(())
            }
        }
    }
}
