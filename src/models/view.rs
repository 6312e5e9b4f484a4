use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WorkoutStatus;

/// A workout with its assigned exercises and their sets, used for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutWithExercises {
    pub id: Uuid,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: WorkoutStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Sorted by `order` ascending.
    pub exercises: Vec<WorkoutExerciseEntry>,
}

/// An assignment inside [`WorkoutWithExercises`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutExerciseEntry {
    pub workout_exercise_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub order: i32,
    /// Sorted by `set_number` ascending.
    pub sets: Vec<SetEntry>,
}

/// A set inside [`WorkoutExerciseEntry`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetEntry {
    pub id: Uuid,
    pub set_number: i32,
    pub reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub is_completed: bool,
}
