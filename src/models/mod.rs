mod daily_log;
mod macro_split;
mod meal_slot;
mod profile;
mod routine;
mod weight_log;

pub use daily_log::{DailyLog, MealEntry};
pub use macro_split::MacroSplit;
pub use meal_slot::MealSlot;
pub use profile::{Gender, Goal, Profile, Somatotype};
pub use routine::{Difficulty, Routine, RoutineExercise};
pub use weight_log::WeightLog;
