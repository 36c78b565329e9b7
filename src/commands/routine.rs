use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use crate::db::RoutineRepository;
use crate::models::{Routine, RoutineExercise};

#[derive(Args)]
pub struct RoutineCommand {
    #[command(subcommand)]
    pub command: RoutineSubcommand,
}

#[derive(Subcommand)]
pub enum RoutineSubcommand {
    /// Create a workout routine
    Add {
        /// Routine name
        name: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Category (push, pull, legs, upper, lower, full_body, ...)
        #[arg(long)]
        category: Option<String>,

        /// Difficulty (beginner, intermediate, advanced)
        #[arg(long)]
        difficulty: Option<String>,

        /// Exercise as ID:SETS:REPS (can be repeated)
        #[arg(long = "exercise", value_name = "EXERCISE")]
        exercises: Vec<String>,
    },

    /// List routines
    List,

    /// Show a routine's exercises
    Show {
        /// Routine ID
        id: String,
    },

    /// Delete a routine
    Delete {
        /// Routine ID
        id: String,
    },
}

impl RoutineCommand {
    pub async fn run(&self, pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
        let repo = RoutineRepository::new(pool.clone());

        match &self.command {
            RoutineSubcommand::Add {
                name,
                description,
                category,
                difficulty,
                exercises,
            } => {
                let parsed: Vec<RoutineExercise> = exercises
                    .iter()
                    .map(|s| parse_exercise(s))
                    .collect::<Result<_, _>>()?;

                let mut routine = Routine::new(name).with_exercises(parsed);
                if let Some(description) = description {
                    routine = routine.with_description(description);
                }
                if let Some(category) = category {
                    routine.category = category.clone();
                }
                if let Some(difficulty) = difficulty {
                    routine.difficulty = difficulty.parse()?;
                }

                repo.create(&routine).await?;
                println!("Created routine '{}' ({})", routine.name, routine.id);
                Ok(())
            }

            RoutineSubcommand::List => {
                let routines = repo.list().await?;
                if routines.is_empty() {
                    println!("No routines.");
                    return Ok(());
                }
                for routine in routines {
                    println!(
                        "{}  {} [{}] ({} exercises)",
                        routine.id,
                        routine.name,
                        routine.difficulty,
                        routine.exercises.len()
                    );
                }
                Ok(())
            }

            RoutineSubcommand::Show { id } => {
                let routine = repo
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| format!("Routine not found: {}", id))?;
                println!("{}", routine);
                Ok(())
            }

            RoutineSubcommand::Delete { id } => {
                repo.delete(id).await?;
                println!("Deleted routine {}", id);
                Ok(())
            }
        }
    }
}

fn parse_exercise(spec: &str) -> Result<RoutineExercise, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid exercise '{}'. Expected ID:SETS:REPS",
            spec
        ));
    }
    let sets = parts[1]
        .parse()
        .map_err(|_| format!("Invalid sets in '{}'", spec))?;
    let reps = parts[2]
        .parse()
        .map_err(|_| format!("Invalid reps in '{}'", spec))?;
    Ok(RoutineExercise::new(parts[0], sets, reps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise() {
        let exercise = parse_exercise("bench-press:3:8").unwrap();
        assert_eq!(exercise.exercise_id, "bench-press");
        assert_eq!(exercise.sets, 3);
        assert_eq!(exercise.reps, 8);
    }

    #[test]
    fn test_parse_exercise_rejects_malformed() {
        assert!(parse_exercise("bench-press").is_err());
        assert!(parse_exercise("bench-press:three:8").is_err());
    }
}
