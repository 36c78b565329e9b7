use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::WeightLogRepository;
use crate::models::WeightLog;
use crate::remote::RestRemote;
use crate::sync::SyncEngine;

#[derive(Args)]
pub struct WeightCommand {
    #[command(subcommand)]
    pub command: WeightSubcommand,
}

#[derive(Subcommand)]
pub enum WeightSubcommand {
    /// Record a weigh-in (overwrites the same date)
    Add {
        /// Weight in kg
        weight: f64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show weigh-in history, oldest first
    List {
        /// Show only the most recent N entries
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

impl WeightCommand {
    pub async fn run(
        &self,
        pool: &SqlitePool,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let repo = WeightLogRepository::new(pool.clone());

        match &self.command {
            WeightSubcommand::Add { weight, date } => {
                let date = parse_date(date.as_deref())?;
                let log = WeightLog::new(&config.user_id, date, *weight);
                repo.upsert_for_date(&log).await?;
                println!("Logged {} kg on {}", weight, date);

                // Best effort: a failed push is surfaced but never undoes
                // the local write, and the next full sync picks it up.
                if config.sync_configured() {
                    let engine = SyncEngine::new(
                        pool.clone(),
                        RestRemote::new(&config.sync.server_url, &config.sync.api_key),
                    );
                    match engine.push_weight_entry(&config.user_id, date, *weight).await {
                        Ok(()) => println!("Pushed to remote."),
                        Err(e) => {
                            tracing::warn!(error = %e, "weight push failed");
                            println!("Could not push to remote ({}). Run 'kilofit sync' later.", e);
                        }
                    }
                }
                Ok(())
            }

            WeightSubcommand::List { limit } => {
                let logs = repo.list(&config.user_id).await?;
                if logs.is_empty() {
                    println!("No weigh-ins recorded.");
                    return Ok(());
                }

                let skip = limit.map_or(0, |n| logs.len().saturating_sub(n));
                for log in &logs[skip..] {
                    println!("{}  {:.1} kg", log.date, log.weight);
                }
                Ok(())
            }
        }
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(s) => Ok(s
            .parse()
            .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))?),
        None => Ok(Local::now().date_naive()),
    }
}
