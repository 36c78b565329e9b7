use serde::{Deserialize, Serialize};
use std::fmt;

/// Macronutrient amounts in grams.
///
/// Used both for computed daily targets (whole-gram values) and for
/// running intake totals (fractional values from logged portions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroSplit {
    pub fn new(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
        }
    }

    /// Adds another split into this one, field by field.
    pub fn add(&mut self, other: &MacroSplit) {
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fats += other.fats;
    }
}

impl fmt::Display for MacroSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0}g protein / {:.0}g carbs / {:.0}g fats",
            self.protein, self.carbs, self.fats
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates_each_field() {
        let mut total = MacroSplit::new(10.0, 20.0, 5.0);
        total.add(&MacroSplit::new(2.5, 7.0, 1.5));

        assert_eq!(total, MacroSplit::new(12.5, 27.0, 6.5));
    }

    #[test]
    fn test_json_roundtrip() {
        let split = MacroSplit::new(140.0, 200.0, 67.0);
        let json = serde_json::to_string(&split).unwrap();
        let parsed: MacroSplit = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, split);
    }
}
