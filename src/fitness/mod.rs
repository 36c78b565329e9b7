//! Pure calorie/macro calculation engine.
//!
//! Every function here is deterministic and side-effect free: explicit
//! inputs in, value out. Bad numeric input yields a defined sentinel
//! instead of a panic, since these values feed directly into rendering.

use chrono::{Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Gender, Goal, MacroSplit, Somatotype};

/// Minimum safe daily calories (WHO guideline). Targets below this are
/// reported, never silently clamped.
pub const MIN_SAFE_CALORIES: i32 = 1200;

/// Activity level multipliers for TDEE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Physical job or twice-daily training
    Athlete,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Athlete => 1.9,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLevel::Sedentary => write!(f, "sedentary"),
            ActivityLevel::Light => write!(f, "light"),
            ActivityLevel::Moderate => write!(f, "moderate"),
            ActivityLevel::Active => write!(f, "active"),
            ActivityLevel::Athlete => write!(f, "athlete"),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "athlete" => Ok(ActivityLevel::Athlete),
            _ => Err(format!(
                "Invalid activity level '{}'. Valid options: sedentary, light, moderate, active, athlete",
                s
            )),
        }
    }
}

/// Intensity classification for a weekly rate. Used for user-facing
/// warnings, not hard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateIntensity {
    Aggressive,
    Moderate,
    Conservative,
    Lean,
    Steady,
}

impl fmt::Display for RateIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateIntensity::Aggressive => write!(f, "aggressive"),
            RateIntensity::Moderate => write!(f, "moderate"),
            RateIntensity::Conservative => write!(f, "conservative"),
            RateIntensity::Lean => write!(f, "lean"),
            RateIntensity::Steady => write!(f, "steady"),
        }
    }
}

/// Evidence-based weekly rate bounds per goal, in kg/week.
/// Bounds the CLI's accepted range and drives the intensity warnings.
pub fn rate_limits(goal: Goal) -> (f64, f64) {
    match goal {
        Goal::Cut => (-0.75, -0.25),
        Goal::Bulk => (0.10, 0.35),
        Goal::Maintain => (-0.10, 0.10),
    }
}

pub fn recommended_rate(goal: Goal) -> f64 {
    match goal {
        Goal::Cut => -0.5,
        Goal::Bulk => 0.25,
        Goal::Maintain => 0.0,
    }
}

/// Whether a rate exceeds the safe bound for its goal.
pub fn is_aggressive_rate(goal: Goal, rate: f64) -> bool {
    match goal {
        Goal::Cut => rate < -0.75,
        Goal::Bulk => rate > 0.35,
        Goal::Maintain => false,
    }
}

pub fn rate_intensity(goal: Goal, rate: f64) -> RateIntensity {
    match goal {
        Goal::Cut => {
            if rate <= -0.75 {
                RateIntensity::Aggressive
            } else if rate <= -0.5 {
                RateIntensity::Moderate
            } else {
                RateIntensity::Conservative
            }
        }
        Goal::Bulk => {
            if rate >= 0.35 {
                RateIntensity::Aggressive
            } else if rate >= 0.25 {
                RateIntensity::Moderate
            } else {
                RateIntensity::Lean
            }
        }
        Goal::Maintain => RateIntensity::Steady,
    }
}

/// Body mass index, fixed to one decimal place. Returns `"0.0"` when
/// either input is missing or non-positive.
pub fn bmi(weight_kg: f64, height_cm: f64) -> String {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return "0.0".to_string();
    }
    let height_m = height_cm / 100.0;
    format!("{:.1}", weight_kg / (height_m * height_m))
}

/// Healthy weight range [18.5, 25] BMI for a height, in whole kg.
pub fn healthy_weight_range(height_cm: f64) -> (i32, i32) {
    let height_m = height_cm / 100.0;
    let sq = height_m * height_m;
    ((18.5 * sq).round() as i32, (25.0 * sq).round() as i32)
}

/// Basal metabolic rate via the Mifflin-St Jeor equation.
pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, gender: Gender) -> f64 {
    let s = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + s
}

/// Total daily energy expenditure: BMR scaled by the activity multiplier.
pub fn tdee(bmr: f64, activity_multiplier: f64) -> i32 {
    (bmr * activity_multiplier).round() as i32
}

/// Legacy flat-multiplier calorie target (cut 0.85x / maintain 1.0x /
/// bulk 1.1x). Retained as a fallback for profiles without a weekly rate.
pub fn target_calories(tdee: i32, goal: Goal) -> i32 {
    let multiplier = match goal {
        Goal::Cut => 0.85,
        Goal::Maintain => 1.0,
        Goal::Bulk => 1.1,
    };
    (tdee as f64 * multiplier).round() as i32
}

/// Rate-based calorie target. 1 kg of tissue is roughly 7700 kcal, so a
/// weekly rate of R kg maps to a daily imbalance of R * 1100 kcal.
pub fn smart_calories(tdee: i32, weekly_rate_kg: f64) -> i32 {
    (tdee as f64 + weekly_rate_kg * 1100.0).round() as i32
}

/// Whether a computed target falls under the safe daily minimum.
pub fn below_safe_minimum(calories: i32) -> bool {
    calories < MIN_SAFE_CALORIES
}

pub(crate) fn protein_per_kg(goal: Goal) -> f64 {
    match goal {
        Goal::Cut => 2.0,      // preserve muscle during a deficit
        Goal::Bulk => 1.8,     // support muscle protein synthesis
        Goal::Maintain => 1.6, // general active adult
    }
}

/// Macro targets in grams for a calorie budget.
///
/// Protein is fixed first (bodyweight-driven, with a percentage fallback
/// when no weight is known), then fat as a share of calories shifted by
/// somatotype, and carbs absorb the remainder with a 200 kcal floor.
/// That ordering is what makes carbs the flexible lever.
pub fn macros(
    calories: i32,
    goal: Goal,
    weight_kg: Option<f64>,
    somatotype: Option<Somatotype>,
) -> MacroSplit {
    let calories = calories as f64;

    let mut fat_percent: f64 = match goal {
        Goal::Cut => 0.30,
        Goal::Bulk => 0.20,
        Goal::Maintain => 0.25,
    };
    match somatotype {
        Some(Somatotype::Endomorph) => fat_percent = (fat_percent + 0.05).min(0.35),
        Some(Somatotype::Ectomorph) => fat_percent = (fat_percent - 0.05).max(0.15),
        _ => {}
    }

    let protein_grams = match weight_kg {
        Some(w) if w > 0.0 => (w * protein_per_kg(goal)).round(),
        _ => {
            let protein_percent = match goal {
                Goal::Cut => 0.35,
                Goal::Bulk | Goal::Maintain => 0.30,
            };
            (calories * protein_percent / 4.0).round()
        }
    };

    let fat_cals = calories * fat_percent;
    let fat_grams = (fat_cals / 9.0).round();

    let protein_cals = protein_grams * 4.0;
    let carb_cals = (calories - protein_cals - fat_cals).max(200.0);
    let carb_grams = (carb_cals / 4.0).round();

    MacroSplit::new(protein_grams, carb_grams, fat_grams)
}

/// Whole weeks to reach the target at the given rate. Zero when the rate
/// is zero or the target is already met.
pub fn weeks_to_goal(current_weight: f64, target_weight: f64, weekly_rate: f64) -> u32 {
    if weekly_rate == 0.0 || current_weight == target_weight {
        return 0;
    }
    ((target_weight - current_weight).abs() / weekly_rate.abs()).ceil() as u32
}

/// Projected date of reaching the target weight.
///
/// A zero rate projects to today; a rate pointing away from the target
/// projects ten years out. Both are defined edge cases, not errors.
pub fn projected_date(current_weight: f64, target_weight: f64, weekly_rate: f64) -> NaiveDate {
    let today = Local::now().date_naive();
    if weekly_rate == 0.0 {
        return today;
    }

    let diff = target_weight - current_weight;
    if (diff > 0.0 && weekly_rate < 0.0) || (diff < 0.0 && weekly_rate > 0.0) {
        return today
            .checked_add_months(Months::new(120))
            .unwrap_or(today);
    }

    let days = (diff / weekly_rate * 7.0).abs();
    today + Duration::days(days as i64)
}
