use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MacroSplit, MealSlot};

/// A single logged portion of food. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub food_id: String,
    pub food_name: String,
    pub slot: MealSlot,
    pub quantity: f64,
    pub unit: String,
    pub grams: f64,
    pub calories: f64,
    pub macros: MacroSplit,
    pub timestamp: DateTime<Utc>,
}

impl MealEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        food_id: impl Into<String>,
        food_name: impl Into<String>,
        slot: MealSlot,
        quantity: f64,
        unit: impl Into<String>,
        grams: f64,
        calories: f64,
        macros: MacroSplit,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            food_id: food_id.into(),
            food_name: food_name.into(),
            slot,
            quantity,
            unit: unit.into(),
            grams,
            calories,
            macros,
            timestamp: Utc::now(),
        }
    }
}

/// Per-day food diary aggregate: running totals plus the ordered list of
/// meal entries they were accumulated from.
///
/// Invariant: `calories` and `macros` always equal the sums over `meals`.
/// All mutation goes through [`DailyLog::add_meal`] to keep that true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub user_id: String,
    pub date: NaiveDate,
    pub calories: f64,
    pub macros: MacroSplit,
    pub meals: Vec<MealEntry>,
}

impl DailyLog {
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            calories: 0.0,
            macros: MacroSplit::default(),
            meals: Vec::new(),
        }
    }

    /// Appends a meal entry and folds it into the totals in the same call.
    pub fn add_meal(&mut self, entry: MealEntry) {
        self.calories += entry.calories;
        self.macros.add(&entry.macros);
        self.meals.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, calories: f64, protein: f64, carbs: f64, fats: f64) -> MealEntry {
        MealEntry::new(
            "food-1",
            name,
            MealSlot::Lunch,
            1.0,
            "serving",
            100.0,
            calories,
            MacroSplit::new(protein, carbs, fats),
        )
    }

    #[test]
    fn test_add_meal_updates_totals() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut log = DailyLog::new("user1", date);

        log.add_meal(entry("Eggs", 155.0, 13.0, 1.1, 11.0));
        log.add_meal(entry("Rice", 130.0, 2.7, 28.0, 0.3));

        assert_eq!(log.meals.len(), 2);
        assert_eq!(log.calories, 285.0);
        assert_eq!(log.macros.protein, 15.7);
        assert_eq!(log.macros.carbs, 29.1);
        assert_eq!(log.macros.fats, 11.3);
    }

    #[test]
    fn test_totals_equal_sum_of_meals() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut log = DailyLog::new("user1", date);

        for i in 1..=5 {
            let f = i as f64;
            log.add_meal(entry("Food", f * 100.0, f * 10.0, f * 20.0, f * 5.0));
        }

        let calories: f64 = log.meals.iter().map(|m| m.calories).sum();
        let protein: f64 = log.meals.iter().map(|m| m.macros.protein).sum();
        let carbs: f64 = log.meals.iter().map(|m| m.macros.carbs).sum();
        let fats: f64 = log.meals.iter().map(|m| m.macros.fats).sum();

        assert_eq!(log.calories, calories);
        assert_eq!(log.macros.protein, protein);
        assert_eq!(log.macros.carbs, carbs);
        assert_eq!(log.macros.fats, fats);
    }

    #[test]
    fn test_json_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut log = DailyLog::new("user1", date);
        log.add_meal(entry("Chicken", 250.0, 30.0, 0.0, 8.0));

        let json = serde_json::to_string(&log).unwrap();
        let parsed: DailyLog = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, log);
    }
}
