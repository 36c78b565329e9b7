use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::DailyLogRepository;
use crate::models::{MacroSplit, MealEntry, MealSlot};
use crate::remote::RestRemote;
use crate::sync::SyncEngine;

#[derive(Args)]
pub struct DiaryCommand {
    #[command(subcommand)]
    pub command: DiarySubcommand,
}

#[derive(Subcommand)]
pub enum DiarySubcommand {
    /// Log a food to the day's diary
    Add {
        /// Food name
        name: String,

        /// Calories for this portion
        #[arg(long, short)]
        calories: f64,

        /// Meal slot (breakfast, lunch, dinner, snack)
        #[arg(long, short, default_value = "snack")]
        slot: String,

        /// Protein grams
        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        /// Carb grams
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        /// Fat grams
        #[arg(long, default_value_t = 0.0)]
        fats: f64,

        /// Portion quantity
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        /// Portion unit
        #[arg(long, default_value = "serving")]
        unit: String,

        /// Portion weight in grams
        #[arg(long, default_value_t = 100.0)]
        grams: f64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show a day's diary with totals
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },
}

impl DiaryCommand {
    pub async fn run(
        &self,
        pool: &SqlitePool,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let repo = DailyLogRepository::new(pool.clone());

        match &self.command {
            DiarySubcommand::Add {
                name,
                calories,
                slot,
                protein,
                carbs,
                fats,
                quantity,
                unit,
                grams,
                date,
            } => {
                let date = parse_date(date.as_deref())?;
                let slot: MealSlot = slot.parse()?;

                let entry = MealEntry::new(
                    "custom",
                    name,
                    slot,
                    *quantity,
                    unit,
                    *grams,
                    *calories,
                    MacroSplit::new(*protein, *carbs, *fats),
                );
                let log = repo.add_meal(&config.user_id, date, entry).await?;

                println!("Logged {} ({} kcal, {})", name, calories, slot);
                println!("Day total: {:.0} kcal, {}", log.calories, log.macros);

                // Best effort, same as weight: local write already
                // happened, the next full sync covers a failed push.
                if config.sync_configured() {
                    let engine = SyncEngine::new(
                        pool.clone(),
                        RestRemote::new(&config.sync.server_url, &config.sync.api_key),
                    );
                    match engine.push_daily_log(&log).await {
                        Ok(()) => println!("Pushed to remote."),
                        Err(e) => {
                            tracing::warn!(error = %e, "daily log push failed");
                            println!("Could not push to remote ({}). Run 'kilofit sync' later.", e);
                        }
                    }
                }
                Ok(())
            }

            DiarySubcommand::Show { date } => {
                let date = parse_date(date.as_deref())?;
                let Some(log) = repo.get(&config.user_id, date).await? else {
                    println!("Nothing logged on {}.", date);
                    return Ok(());
                };

                println!("Diary for {}", date);
                println!("================");
                for meal in &log.meals {
                    println!(
                        "  [{}] {} - {:.0} kcal ({})",
                        meal.slot, meal.food_name, meal.calories, meal.macros
                    );
                }
                println!();
                println!("Total: {:.0} kcal, {}", log.calories, log.macros);
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
