use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::Somatotype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!(
                "Invalid difficulty '{}'. Valid options: beginner, intermediate, advanced",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub exercise_id: String,
    pub sets: u32,
    pub reps: u32,
}

impl RoutineExercise {
    pub fn new(exercise_id: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            sets,
            reps,
        }
    }
}

/// A named workout template. Routines live in the local store only; they
/// are not part of the sync reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub estimated_minutes: i32,
    pub rest_seconds: i32,
    pub exercises: Vec<RoutineExercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Routine {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            category: "Custom".to_string(),
            difficulty: Difficulty::Intermediate,
            estimated_minutes: 45,
            rest_seconds: 90,
            exercises: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<RoutineExercise>) -> Self {
        self.exercises = exercises;
        self
    }

    /// The starter routine assigned during profile setup for a somatotype.
    pub fn default_for(somatotype: Somatotype) -> Routine {
        let now = Utc::now();
        match somatotype {
            Somatotype::Ectomorph => Routine {
                id: "ecto-push-a".to_string(),
                name: "Ectomorph Push (Day A)".to_string(),
                description: "Chest, shoulders and triceps. Heavy weights, long rests."
                    .to_string(),
                category: "Ectomorph".to_string(),
                difficulty: Difficulty::Intermediate,
                estimated_minutes: 45,
                rest_seconds: 150,
                exercises: vec![
                    RoutineExercise::new("bench-press", 4, 6),
                    RoutineExercise::new("incline-db-press", 3, 8),
                    RoutineExercise::new("overhead-press", 3, 8),
                    RoutineExercise::new("lateral-raise", 3, 12),
                    RoutineExercise::new("tricep-extension", 3, 10),
                ],
                created_at: now,
                updated_at: now,
            },
            Somatotype::Mesomorph => Routine {
                id: "meso-upper".to_string(),
                name: "Mesomorph Upper Body".to_string(),
                description: "Balanced hypertrophy for chest, back, shoulders and arms."
                    .to_string(),
                category: "Mesomorph".to_string(),
                difficulty: Difficulty::Intermediate,
                estimated_minutes: 55,
                rest_seconds: 90,
                exercises: vec![
                    RoutineExercise::new("bench-press", 4, 10),
                    RoutineExercise::new("row", 4, 10),
                    RoutineExercise::new("db-shoulder-press", 3, 12),
                    RoutineExercise::new("lat-pulldown", 3, 12),
                    RoutineExercise::new("cable-fly", 3, 15),
                    RoutineExercise::new("hammer-curl", 3, 12),
                    RoutineExercise::new("tricep-extension", 3, 12),
                ],
                created_at: now,
                updated_at: now,
            },
            Somatotype::Endomorph => Routine {
                id: "endo-fullbody-a".to_string(),
                name: "Endomorph Full Body A".to_string(),
                description: "Metabolic circuit of compound movements with short rests."
                    .to_string(),
                category: "Endomorph".to_string(),
                difficulty: Difficulty::Intermediate,
                estimated_minutes: 45,
                rest_seconds: 45,
                exercises: vec![
                    RoutineExercise::new("goblet-squat", 4, 15),
                    RoutineExercise::new("push-up", 4, 15),
                    RoutineExercise::new("db-row", 4, 12),
                    RoutineExercise::new("walking-lunge", 3, 12),
                    RoutineExercise::new("mountain-climbers", 3, 30),
                    RoutineExercise::new("plank", 3, 45),
                ],
                created_at: now,
                updated_at: now,
            },
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        writeln!(f, "Category:   {}", self.category)?;
        writeln!(f, "Difficulty: {}", self.difficulty)?;
        writeln!(f, "Duration:   ~{} min", self.estimated_minutes)?;
        writeln!(f, "Rest:       {}s between sets", self.rest_seconds)?;

        if !self.exercises.is_empty() {
            writeln!(f, "\nExercises:")?;
            for ex in &self.exercises {
                writeln!(f, "  - {} ({}x{})", ex.exercise_id, ex.sets, ex.reps)?;
            }
        }

        Ok(())
    }
}
