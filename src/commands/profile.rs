use chrono::Local;
use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::{ProfileRepository, RoutineRepository};
use crate::fitness;
use crate::models::{Gender, Goal, Profile, Routine, Somatotype};

#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Create or replace the profile and compute calorie/macro targets
    Setup {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Gender (male, female)
        #[arg(long)]
        gender: String,

        /// Age in years
        #[arg(long)]
        age: i32,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Activity level (sedentary, light, moderate, active, athlete)
        #[arg(long, default_value = "moderate")]
        activity: String,

        /// Goal (cut, maintain, bulk)
        #[arg(long, default_value = "maintain")]
        goal: String,

        /// Weekly rate in kg/week (negative loses weight)
        #[arg(long)]
        rate: Option<f64>,

        /// Target weight in kg
        #[arg(long)]
        target_weight: Option<f64>,

        /// Body type (ectomorph, mesomorph, endomorph)
        #[arg(long)]
        somatotype: Option<String>,
    },

    /// Show the profile with computed targets and goal projection
    Show,

    /// Change the goal, weekly rate, or target weight
    Goal {
        /// Goal (cut, maintain, bulk)
        goal: String,

        /// Weekly rate in kg/week; defaults to the recommended rate
        #[arg(long)]
        rate: Option<f64>,

        /// Target weight in kg
        #[arg(long)]
        target_weight: Option<f64>,
    },
}

impl ProfileCommand {
    pub async fn run(
        &self,
        pool: &SqlitePool,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let repo = ProfileRepository::new(pool.clone());

        match &self.command {
            ProfileSubcommand::Setup {
                name,
                email,
                gender,
                age,
                height,
                weight,
                activity,
                goal,
                rate,
                target_weight,
                somatotype,
            } => {
                let gender: Gender = gender.parse()?;
                let activity: fitness::ActivityLevel = activity.parse()?;
                let goal: Goal = goal.parse()?;
                let somatotype = somatotype
                    .as_deref()
                    .map(|s| s.parse::<Somatotype>())
                    .transpose()?;

                let mut profile = Profile::new(&config.user_id);
                profile.name = name.clone().unwrap_or_default();
                profile.email = email.clone().unwrap_or_default();
                profile.gender = gender;
                profile.age = *age;
                profile.height = *height;
                profile.weight = *weight;
                profile.activity_level = activity.multiplier();
                profile.goal = goal;
                profile.weekly_rate = rate.or(Some(fitness::recommended_rate(goal)));
                profile.target_weight = *target_weight;
                profile.start_weight = Some(*weight);
                profile.start_date = Some(Local::now().date_naive());
                profile.somatotype = somatotype;
                profile.recompute_derived();

                print_rate_warnings(&profile);
                repo.upsert(&profile).await?;

                println!("Profile saved.");
                print_targets(&profile);

                // First-time setup seeds the starter routine for the
                // body type, without clobbering one the user already has.
                if let Some(somatotype) = somatotype {
                    let routine = Routine::default_for(somatotype);
                    let routine_repo = RoutineRepository::new(pool.clone());
                    if routine_repo.create_if_absent(&routine).await? {
                        println!();
                        println!("Added starter routine: {}", routine.name);
                    }
                }

                Ok(())
            }

            ProfileSubcommand::Show => {
                let Some(mut profile) = repo.get(&config.user_id).await? else {
                    println!("No profile found. Run 'kilofit profile setup' first.");
                    return Ok(());
                };

                // Targets drift when the weight changes out from under
                // them; recompute on load so the display is never stale.
                if profile.macros_stale() {
                    tracing::debug!(user_id = %profile.id, "recomputing stale targets");
                    profile.recompute_derived();
                    repo.upsert(&profile).await?;
                }

                print_profile(&profile);
                Ok(())
            }

            ProfileSubcommand::Goal {
                goal,
                rate,
                target_weight,
            } => {
                let Some(mut profile) = repo.get(&config.user_id).await? else {
                    println!("No profile found. Run 'kilofit profile setup' first.");
                    return Ok(());
                };

                let goal: Goal = goal.parse()?;
                profile.goal = goal;
                profile.weekly_rate = Some(rate.unwrap_or(fitness::recommended_rate(goal)));
                if target_weight.is_some() {
                    profile.target_weight = *target_weight;
                }
                profile.recompute_derived();

                print_rate_warnings(&profile);
                repo.upsert(&profile).await?;

                println!("Goal updated.");
                print_targets(&profile);
                Ok(())
            }
        }
    }
}

fn print_rate_warnings(profile: &Profile) {
    let rate = profile.weekly_rate.unwrap_or(0.0);
    if fitness::is_aggressive_rate(profile.goal, rate) {
        let (min, max) = fitness::rate_limits(profile.goal);
        println!(
            "Warning: {:+.2} kg/week is an aggressive rate for a {} (recommended range {:+.2} to {:+.2}).",
            rate, profile.goal, min, max
        );
    }
    if let Some(target) = profile.target_calories() {
        if fitness::below_safe_minimum(target) {
            println!(
                "Warning: target of {} kcal is below the safe minimum of {} kcal.",
                target,
                fitness::MIN_SAFE_CALORIES
            );
        }
    }
}

fn print_targets(profile: &Profile) {
    if let Some(tdee) = profile.tdee {
        println!("  Maintenance: {} kcal/day", tdee);
    }
    if let Some(target) = profile.target_calories() {
        println!("  Target:      {} kcal/day", target);
    }
    if let Some(macros) = &profile.macros {
        println!("  Macros:      {}", macros);
    }
}

fn print_profile(profile: &Profile) {
    println!("Profile");
    println!("=======");
    println!();
    if !profile.name.is_empty() {
        println!("Name:     {}", profile.name);
    }
    println!("Gender:   {}", profile.gender);
    println!("Age:      {}", profile.age);
    println!("Height:   {} cm", profile.height);
    println!("Weight:   {} kg", profile.weight);
    println!("BMI:      {}", fitness::bmi(profile.weight, profile.height));
    let (min, max) = fitness::healthy_weight_range(profile.height);
    println!("Healthy weight range: {}-{} kg", min, max);
    println!();

    let rate = profile.weekly_rate.unwrap_or(0.0);
    println!(
        "Goal:     {} ({:+.2} kg/week, {})",
        profile.goal,
        rate,
        fitness::rate_intensity(profile.goal, rate)
    );
    if let Some(somatotype) = profile.somatotype {
        println!("Body type: {}", somatotype);
    }
    print_targets(profile);

    if let (Some(target_weight), Some(rate)) = (profile.target_weight, profile.weekly_rate) {
        let weeks = fitness::weeks_to_goal(profile.weight, target_weight, rate);
        if weeks > 0 {
            println!();
            println!(
                "Projection: {} kg in ~{} weeks (around {})",
                target_weight,
                weeks,
                fitness::projected_date(profile.weight, target_weight, rate)
            );
        }
    }
}
