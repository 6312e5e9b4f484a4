use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest exercise name accepted by the catalog.
pub const MAX_EXERCISE_NAME_LEN: usize = 255;

/// A named movement that can be assigned to workouts.
///
/// Global exercises have no owner and are visible to everyone. Private
/// exercises always carry the owning user's id; the storage layer rejects any
/// other combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub is_global: bool,
    /// Owner of a private exercise. Always `None` for global ones.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for adding a private exercise to the caller's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExerciseInput {
    pub name: String,
}
