use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealSlot::Breakfast => write!(f, "breakfast"),
            MealSlot::Lunch => write!(f, "lunch"),
            MealSlot::Dinner => write!(f, "dinner"),
            MealSlot::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            _ => Err(format!(
                "Invalid meal slot '{}'. Valid options: breakfast, lunch, dinner, snack",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_slot_display() {
        assert_eq!(format!("{}", MealSlot::Breakfast), "breakfast");
        assert_eq!(format!("{}", MealSlot::Snack), "snack");
    }

    #[test]
    fn test_meal_slot_from_str() {
        assert_eq!(MealSlot::from_str("LUNCH").unwrap(), MealSlot::Lunch);
        assert_eq!(MealSlot::from_str("dinner").unwrap(), MealSlot::Dinner);
        assert!(MealSlot::from_str("brunch").is_err());
    }

    #[test]
    fn test_meal_slot_json_roundtrip() {
        let json = serde_json::to_string(&MealSlot::Snack).unwrap();
        assert_eq!(json, "\"snack\"");
        let parsed: MealSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MealSlot::Snack);
    }
}
