use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backup;
mod commands;
mod config;
mod db;
mod fitness;
mod models;
mod remote;
mod sync;

use commands::{
    BackupCommand, ConfigCommand, DiaryCommand, ProfileCommand, RoutineCommand, SyncCommand,
    WeightCommand,
};
use config::Config;
use db::init_db;

#[derive(Parser)]
#[command(name = "kilofit")]
#[command(version)]
#[command(about = "A nutrition and fitness tracking CLI", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the profile and calorie/macro targets
    Profile(ProfileCommand),

    /// Record and review weigh-ins
    Weight(WeightCommand),

    /// Log food and review the daily diary
    Diary(DiaryCommand),

    /// Manage workout routines
    Routine(RoutineCommand),

    /// Sync with the remote backend
    Sync(SyncCommand),

    /// Export or import a data snapshot
    Backup(BackupCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kilofit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Profile(cmd)) => {
            let pool = init_db(Some(config.database_path.clone())).await?;
            cmd.run(&pool, &config).await?;
        }
        Some(Commands::Weight(cmd)) => {
            let pool = init_db(Some(config.database_path.clone())).await?;
            cmd.run(&pool, &config).await?;
        }
        Some(Commands::Diary(cmd)) => {
            let pool = init_db(Some(config.database_path.clone())).await?;
            cmd.run(&pool, &config).await?;
        }
        Some(Commands::Routine(cmd)) => {
            let pool = init_db(Some(config.database_path.clone())).await?;
            cmd.run(&pool).await?;
        }
        Some(Commands::Sync(cmd)) => {
            let pool = init_db(Some(config.database_path.clone())).await?;
            cmd.run(&pool, &config).await?;
        }
        Some(Commands::Backup(cmd)) => {
            let pool = init_db(Some(config.database_path.clone())).await?;
            cmd.run(&pool, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
