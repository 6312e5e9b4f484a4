use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Exercise;

/// A catalog exercise placed into a workout.
///
/// `order` is unique within the workout and strictly positive. Removing an
/// assignment leaves a gap; new assignments always go after the current
/// maximum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for assigning an existing exercise to a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignExerciseInput {
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    /// Explicit position. Computed as `max + 1` when omitted.
    #[serde(default)]
    pub order: Option<i32>,
}

/// Result of creating a private exercise and assigning it in one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAssignment {
    pub exercise: Exercise,
    pub assignment: WorkoutExercise,
}
