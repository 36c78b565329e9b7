use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MacroSplit;
use crate::fitness;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!(
                "Invalid gender '{}'. Valid options: male, female",
                s
            )),
        }
    }
}

/// Goal strategy for calorie targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Cut,
    Maintain,
    Bulk,
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Cut => write!(f, "cut"),
            Goal::Maintain => write!(f, "maintain"),
            Goal::Bulk => write!(f, "bulk"),
        }
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cut" => Ok(Goal::Cut),
            "maintain" => Ok(Goal::Maintain),
            "bulk" => Ok(Goal::Bulk),
            _ => Err(format!(
                "Invalid goal '{}'. Valid options: cut, maintain, bulk",
                s
            )),
        }
    }
}

/// Body-type classifier used to shift the fat/carb split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Somatotype {
    Ectomorph,
    Mesomorph,
    Endomorph,
}

impl fmt::Display for Somatotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Somatotype::Ectomorph => write!(f, "ectomorph"),
            Somatotype::Mesomorph => write!(f, "mesomorph"),
            Somatotype::Endomorph => write!(f, "endomorph"),
        }
    }
}

impl FromStr for Somatotype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ectomorph" => Ok(Somatotype::Ectomorph),
            "mesomorph" => Ok(Somatotype::Mesomorph),
            "endomorph" => Ok(Somatotype::Endomorph),
            _ => Err(format!(
                "Invalid somatotype '{}'. Valid options: ectomorph, mesomorph, endomorph",
                s
            )),
        }
    }
}

/// One profile per user, keyed by the user id.
///
/// `tdee` and `macros` are derived from the other fields and recomputed
/// whenever weight, goal, weekly rate, or somatotype change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub height: f64,
    pub weight: f64,
    pub activity_level: f64,
    pub goal: Goal,
    pub start_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub weekly_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub somatotype: Option<Somatotype>,
    pub tdee: Option<i32>,
    pub macros: Option<MacroSplit>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: String::new(),
            name: String::new(),
            gender: Gender::Male,
            age: 25,
            height: 170.0,
            weight: 70.0,
            activity_level: 1.55,
            goal: Goal::Maintain,
            start_weight: None,
            target_weight: None,
            weekly_rate: None,
            start_date: None,
            somatotype: None,
            tdee: None,
            macros: None,
        }
    }

    /// Recomputes the derived fields (maintenance calories and macro
    /// targets) from the current body metrics and goal parameters.
    pub fn recompute_derived(&mut self) {
        let bmr = fitness::bmr(self.weight, self.height, self.age, self.gender);
        let tdee = fitness::tdee(bmr, self.activity_level);
        let target = fitness::smart_calories(tdee, self.weekly_rate.unwrap_or(0.0));

        self.tdee = Some(tdee);
        self.macros = Some(fitness::macros(
            target,
            self.goal,
            Some(self.weight),
            self.somatotype,
        ));
    }

    /// Daily calorie target from the stored maintenance calories and the
    /// configured weekly rate. Falls back to the legacy flat multiplier
    /// when no rate has been set.
    pub fn target_calories(&self) -> Option<i32> {
        let tdee = self.tdee?;
        match self.weekly_rate {
            Some(rate) => Some(fitness::smart_calories(tdee, rate)),
            None => Some(fitness::target_calories(tdee, self.goal)),
        }
    }

    /// Whether the stored macro targets have drifted from what the current
    /// weight/goal formula would produce. Checked against the protein
    /// figure, which is bodyweight-driven: deviation above 10% means the
    /// targets were computed from stale inputs.
    pub fn macros_stale(&self) -> bool {
        let Some(stored) = &self.macros else {
            return self.tdee.is_some();
        };
        let expected = (self.weight * fitness::protein_per_kg(self.goal)).round();
        if expected <= 0.0 {
            return false;
        }
        (stored.protein - expected).abs() / expected > 0.10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_from_str() {
        assert_eq!(Goal::from_str("cut").unwrap(), Goal::Cut);
        assert_eq!(Goal::from_str("MAINTAIN").unwrap(), Goal::Maintain);
        assert_eq!(Goal::from_str("Bulk").unwrap(), Goal::Bulk);
        assert!(Goal::from_str("recomp").is_err());
    }

    #[test]
    fn test_goal_json_lowercase() {
        assert_eq!(serde_json::to_string(&Goal::Cut).unwrap(), "\"cut\"");
        let parsed: Goal = serde_json::from_str("\"bulk\"").unwrap();
        assert_eq!(parsed, Goal::Bulk);
    }

    #[test]
    fn test_recompute_derived_end_to_end() {
        // weight 70, height 175, age 25, male, moderate activity, cut at -0.5/wk
        let mut profile = Profile::new("user1");
        profile.height = 175.0;
        profile.goal = Goal::Cut;
        profile.weekly_rate = Some(-0.5);
        profile.recompute_derived();

        // BMR 1673.75 -> TDEE 2594 -> target 2044 -> protein 140g
        assert_eq!(profile.tdee, Some(2594));
        assert_eq!(profile.target_calories(), Some(2044));
        assert_eq!(profile.macros.unwrap().protein, 140.0);
    }

    #[test]
    fn test_macros_stale_detects_weight_drift() {
        let mut profile = Profile::new("user1");
        profile.goal = Goal::Cut;
        profile.recompute_derived();
        assert!(!profile.macros_stale());

        // A 10 kg change moves the expected protein by more than 10%.
        profile.weight = 80.0;
        assert!(profile.macros_stale());

        profile.recompute_derived();
        assert!(!profile.macros_stale());
    }

    #[test]
    fn test_macros_stale_tolerates_small_drift() {
        let mut profile = Profile::new("user1");
        profile.goal = Goal::Maintain;
        profile.recompute_derived();

        // 1 kg off of 70 is well inside the 10% band.
        profile.weight = 71.0;
        assert!(!profile.macros_stale());
    }

    #[test]
    fn test_macros_stale_when_never_computed() {
        let mut profile = Profile::new("user1");
        assert!(!profile.macros_stale());

        profile.tdee = Some(2500);
        assert!(profile.macros_stale());
    }
}
