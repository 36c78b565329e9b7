use clap::{Args, Subcommand};

use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show,

    /// Print the config file path
    Path,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show => {
                println!("Configuration");
                println!("=============");
                println!();
                println!("database_path: {}", config.database_path.display());
                println!("user_id:       {}", config.user_id);
                if config.sync_configured() {
                    let api_key = &config.sync.api_key;
                    println!("sync:");
                    println!("  server_url: {}", config.sync.server_url);
                    println!("  api_key:    {}...", &api_key[..api_key.len().min(8)]);
                } else {
                    println!("sync:          not configured");
                }
                Ok(())
            }
            ConfigSubcommand::Path => {
                println!("{}", Config::default_config_path().display());
                Ok(())
            }
        }
    }
}
